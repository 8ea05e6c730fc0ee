use thiserror::Error;

/// Errors surfaced by the marker data access layer and its handlers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkerError {
    /// Request payload was not valid JSON or had the wrong shape.
    #[error("Invalid request body: {0}")]
    Decode(String),
    /// A required field was missing from the request.
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Marker not found: {0}")]
    NotFound(String),
    /// Any fault talking to (or reading data back from) the backing store.
    #[error("Store error: {0}")]
    Store(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for MarkerError {
    fn from(err: serde_json::Error) -> Self {
        MarkerError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MarkerError>;
