//! Error types for the pyi-core crate.
//!
//! This module provides [`ConfigError`] for configuration loading and
//! validation, and [`AlignmentError`] for the sequence-alignment helper.

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use pyi_core::ConfigError;
///
/// let error = ConfigError::InvalidOption {
///     option: "scan.max_parallel_jobs".to_owned(),
///     reason: "must be positive".to_owned(),
/// };
/// assert!(error.to_string().contains("max_parallel_jobs"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The second sequence handed to [`rzip_longest`](crate::rzip_longest) was
/// longer than the first.
///
/// # Examples
///
/// ```
/// use pyi_core::rzip_longest;
///
/// let err = rzip_longest([1], ["a", "b"]).err().unwrap();
/// assert_eq!(err.first, 1);
/// assert_eq!(err.second, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot align {second} trailing values onto {first} items")]
pub struct AlignmentError {
    /// Length of the first sequence.
    pub first: usize,
    /// Length of the second sequence.
    pub second: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::InvalidOption {
            option: "max_parallel_jobs".to_owned(),
            reason: "must be positive".to_owned(),
        };
        let msg = error.to_string();
        assert!(msg.contains("max_parallel_jobs"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_parse_error_from_serde() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ConfigError::from(err);
        assert!(error.to_string().starts_with("failed to parse configuration"));
    }

    #[test]
    fn test_alignment_error_display() {
        let error = AlignmentError { first: 1, second: 3 };
        assert_eq!(
            error.to_string(),
            "cannot align 3 trailing values onto 1 items"
        );
    }
}
