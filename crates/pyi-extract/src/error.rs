//! Error types for the pyi-extract crate.
//!
//! This module provides the [`ParseError`] type. A `ParseError` is always
//! fatal for the unit being processed: extraction never starts on a tree the
//! parser rejected.

/// Errors that can occur while parsing a Python source unit.
///
/// # Examples
///
/// ```
/// use pyi_extract::ParseError;
///
/// fn describe(err: &ParseError) -> &'static str {
///     match err {
///         ParseError::LanguageInit => "parser setup",
///         ParseError::Parse => "parser gave up",
///         ParseError::Syntax { .. } => "invalid source",
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the Python language on the parser.
    #[error("failed to set Python language")]
    LanguageInit,

    /// The parser produced no tree.
    ///
    /// This typically indicates the parser was cancelled or timed out.
    #[error("failed to parse source code")]
    Parse,

    /// The source is not valid Python.
    #[error("{source_id}:{line}:{column}: {message}")]
    Syntax {
        /// Identifier of the rejected source unit.
        source_id: String,
        /// Line of the first error (1-indexed).
        line: u32,
        /// Column of the first error (1-indexed).
        column: u32,
        /// What the parser found.
        message: String,
    },
}

impl ParseError {
    /// Returns the source identifier for syntax errors.
    #[must_use]
    pub fn source_id(&self) -> Option<&str> {
        match self {
            Self::Syntax { source_id, .. } => Some(source_id),
            Self::LanguageInit | Self::Parse => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_init_display() {
        let err = ParseError::LanguageInit;
        assert_eq!(err.to_string(), "failed to set Python language");
        assert_eq!(err.source_id(), None);
    }

    #[test]
    fn test_syntax_display() {
        let err = ParseError::Syntax {
            source_id: "pkg/mod.py".to_owned(),
            line: 3,
            column: 7,
            message: "invalid syntax".to_owned(),
        };
        assert_eq!(err.to_string(), "pkg/mod.py:3:7: invalid syntax");
        assert_eq!(err.source_id(), Some("pkg/mod.py"));
    }
}
