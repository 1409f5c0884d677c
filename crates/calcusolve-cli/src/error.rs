//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// The store could not be read or written
    #[error("Storage error: {0}")]
    Store(#[from] calcusolve::session::store::StoreError),

    /// Async runtime could not start
    #[error("Runtime error: {message}")]
    Runtime {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a runtime error
    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcusolve::session::store::StoreError;

    #[test]
    fn test_invalid_argument_error() {
        let err = CliError::invalid_argument("Unknown input token: 'x'");
        assert_eq!(err.to_string(), "Invalid argument: Unknown input token: 'x'");
    }

    #[test]
    fn test_runtime_error() {
        assert!(CliError::runtime("no threads").to_string().contains("Runtime"));
    }

    #[test]
    fn test_store_error_conversion() {
        let err: CliError = StoreError::unavailable("disk gone").into();
        assert!(err.to_string().contains("Storage error"));
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CliError = io.into();
        assert!(err.to_string().contains("I/O error"));
    }
}
