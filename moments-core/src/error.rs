//! Error types for moments.

use thiserror::Error;

/// Errors that can occur in moments operations.
#[derive(Error, Debug)]
pub enum MomentsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("{0}")]
    Validation(String),

    #[error("End time must be after start time")]
    InvalidInterval,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MomentsError {
    fn from(err: serde_json::Error) -> Self {
        MomentsError::Serialization(err.to_string())
    }
}

/// Result type alias for moments operations.
pub type MomentsResult<T> = Result<T, MomentsError>;
