//! Error types for the pyi-scanner crate.
//!
//! This module provides the [`ScanError`] type for errors that can occur
//! while discovering and converting files.

use camino::Utf8PathBuf;

/// Errors that can occur during discovery and conversion.
///
/// # Error Recovery Strategy
///
/// - **Walker errors** ([`ScanError::Walk`]): Fatal, propagate immediately
/// - **Per-file errors** ([`ScanError::Read`], [`ScanError::Parse`],
///   [`ScanError::TargetExists`], [`ScanError::Write`]): Report a warning,
///   skip the file, continue with the rest
///
/// The `Display` text of [`ScanError::Parse`] and [`ScanError::TargetExists`]
/// is the text of the warning printed for them.
///
/// # Examples
///
/// ```
/// use pyi_scanner::ScanError;
///
/// let err = ScanError::TargetExists {
///     path: "pkg/mod.pyi".into(),
/// };
/// assert!(err.is_recoverable());
/// assert_eq!(err.to_string(), "file 'pkg/mod.pyi' already exists");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Failed to walk a directory.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Failed to read a source file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a stub file.
    #[error("failed to write file {path}: {source}")]
    Write {
        /// The path of the stub that couldn't be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The stub file exists and overwriting is disabled.
    #[error("file '{path}' already exists")]
    TargetExists {
        /// The existing stub path.
        path: Utf8PathBuf,
    },

    /// The source file is not valid Python.
    #[error("invalid Python file '{path}': {source}")]
    Parse {
        /// The path of the file that couldn't be parsed.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: pyi_extract::ParseError,
    },

    /// Invalid scanner configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl ScanError {
    /// Creates a new [`ScanError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Write`] error.
    #[inline]
    pub fn write(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Parse`] error.
    #[inline]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: pyi_extract::ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` if this error only affects one file.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Read { .. } | Self::Write { .. } | Self::TargetExists { .. } | Self::Parse { .. }
        )
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::TargetExists { path }
            | Self::Parse { path, .. } => Some(path),
            Self::Walk(_) | Self::Config(_) | Self::NonUtf8Path(_) => None,
        }
    }
}

impl From<pyi_core::ConfigError> for ScanError {
    fn from(err: pyi_core::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_scan_error_read() {
        let err = ScanError::read("src/foo.py", io::Error::new(io::ErrorKind::NotFound, "not found"));
        assert!(err.is_recoverable());
        assert_eq!(err.path().map(|p| p.as_str()), Some("src/foo.py"));
        assert!(err.to_string().contains("src/foo.py"));
    }

    #[test]
    fn test_scan_error_parse_message() {
        let source = pyi_extract::ParseError::Syntax {
            source_id: "src/bar.py".to_owned(),
            line: 3,
            column: 5,
            message: "invalid syntax".to_owned(),
        };
        let err = ScanError::parse("src/bar.py", source);
        assert!(err.is_recoverable());
        assert_eq!(err.path().map(|p| p.as_str()), Some("src/bar.py"));
        assert!(err.to_string().starts_with("invalid Python file 'src/bar.py': "));
    }

    #[test]
    fn test_scan_error_target_exists() {
        let err = ScanError::TargetExists {
            path: Utf8PathBuf::from("src/bar.pyi"),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "file 'src/bar.pyi' already exists");
    }

    #[test]
    fn test_scan_error_config() {
        let err = ScanError::config("jobs must be positive");
        assert!(!err.is_recoverable());
        assert!(err.path().is_none());
        assert_eq!(err.to_string(), "invalid configuration: jobs must be positive");
    }

    #[test]
    fn test_scan_error_non_utf8() {
        use std::path::PathBuf;
        let err = ScanError::NonUtf8Path(PathBuf::from("test"));
        assert!(!err.is_recoverable());
        assert!(err.path().is_none());
    }
}
