//! Error types for binwatch operations.
//!
//! Sampling itself never fails: invariant drift is repaired in place and
//! malformed interval input is defaulted. The variants below cover
//! configuration, construction of buffers and controllers, and the
//! terminal front-end.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in binwatch operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    ConfigInvalid {
        /// The configuration key with invalid value.
        key: String,
        /// Error message describing why the value is invalid.
        message: String,
    },

    /// A time-series window must retain at least one sample.
    #[error("window size must be greater than 0")]
    InvalidWindow,

    /// A sample's bucket counts do not add up to the fleet total.
    #[error("sample total {actual} does not match fleet total {expected}")]
    TotalMismatch {
        /// The configured fleet total T.
        expected: u32,
        /// The sum of the offending sample's buckets.
        actual: u32,
    },

    /// Interval text rejected by strict parsing.
    #[error("invalid interval '{0}': expected whole seconds in 1..=60")]
    InvalidInterval(String),

    /// No async runtime available to drive the tick schedule.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Terminal or file I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_error_includes_line_number() {
        let err = Error::ConfigParse { line: 42, message: "invalid value".to_string() };
        let display = err.to_string();

        assert!(display.contains("42"), "Error should include line number: {}", display);
        assert!(display.contains("invalid value"), "Error should include message: {}", display);
    }

    #[test]
    fn test_config_invalid_includes_key() {
        let err = Error::ConfigInvalid {
            key: "sampler.window_size".to_string(),
            message: "must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("sampler.window_size"));
    }

    #[test]
    fn test_total_mismatch_includes_both_totals() {
        let err = Error::TotalMismatch { expected: 830, actual: 100 };
        let display = err.to_string();

        assert!(display.contains("830"));
        assert!(display.contains("100"));
    }

    #[test]
    fn test_invalid_interval_includes_input() {
        let err = Error::InvalidInterval("soon".to_string());
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        assert!(matches!(err, Error::Io(_)), "Should convert to Io");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
