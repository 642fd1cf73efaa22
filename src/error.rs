//! Common error types used throughout reelbot.
//!
//! Remote-call failures are converted to these variants at each component
//! boundary so callers can branch on the failure kind instead of catching
//! broad error chains.

/// Common error type for reelbot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A network request failed or returned a non-success status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote resource was not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A local file operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A response body did not have the expected shape.
    #[error("Unexpected response shape: {0}")]
    DataShape(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new Transport error.
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new DataShape error.
    pub fn data_shape<S: Into<String>>(msg: S) -> Self {
        Self::DataShape(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::transport("connection refused");
        assert_eq!(err.to_string(), "Transport error: connection refused");

        let err = Error::not_found("poster");
        assert_eq!(err.to_string(), "Not found: poster");

        let err = Error::data_shape("missing results field");
        assert_eq!(
            err.to_string(),
            "Unexpected response shape: missing results field"
        );

        let err = Error::invalid_input("bad url");
        assert_eq!(err.to_string(), "Invalid input: bad url");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_result_type() {
        fn ok_fn() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(ok_fn().unwrap(), 42);

        fn err_fn() -> Result<i32> {
            Err(Error::transport("down"))
        }
        assert!(err_fn().is_err());
    }
}
