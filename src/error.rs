//! Error types for duscan
//!
//! The scan itself never fails on individual entries - listing and stat
//! errors are aggregated into counters and the walk continues (see
//! [`crate::stats`]). The types here cover the failures that do abort a
//! run: bad configuration and root-path resolution.
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include the offending value and the
//!   accepted range or format
//! - Preserve error chains for debugging

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the duscan application
#[derive(Error, Debug)]
pub enum ScanError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failed to resolve the scan root to an absolute path (fatal, exit 3)
    #[error("Failed to resolve root path '{}': {source}", path.display())]
    PathResolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O errors on the output streams (report or CSV writing)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization errors during the full dump
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid top-K limit
    #[error("Invalid report limit {limit}: must be at least 1")]
    InvalidLimit { limit: usize },

    /// Unknown report selector letter
    #[error("Unknown report selector '{letter}': known selectors are \"lifdru\"")]
    UnknownReport { letter: char },

    /// Malformed ticker interval
    #[error("Invalid ticker interval '{value}': {reason}")]
    InvalidInterval { value: String, reason: String },
}

/// Result type alias for ScanError
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let cfg_err = ConfigError::InvalidLimit { limit: 0 };
        let scan_err: ScanError = cfg_err.into();
        assert!(matches!(scan_err, ScanError::Config(_)));
    }

    #[test]
    fn test_error_messages_name_the_value() {
        let err = ConfigError::UnknownReport { letter: 'x' };
        assert!(err.to_string().contains('x'));

        let err = ConfigError::InvalidWorkerCount {
            count: 0,
            max: 512,
        };
        assert!(err.to_string().contains("512"));
    }
}
