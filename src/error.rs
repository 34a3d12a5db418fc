//! Error types for Opero operations

use thiserror::Error;

/// Main error type for Opero operations
#[derive(Error, Debug)]
pub enum OperoError {
    /// Task tag outside the known set
    #[error("Unknown task type: {0}")]
    UnknownTaskType(String),

    /// No contact with the given id
    #[error("Contact {0} not found")]
    ContactNotFound(u64),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server plumbing error
    #[error("Server error: {0}")]
    Server(#[from] anyhow::Error),
}

impl From<serde_json::Error> for OperoError {
    fn from(err: serde_json::Error) -> Self {
        OperoError::Serialization(err.to_string())
    }
}

/// Result type alias for Opero operations
pub type OperoResult<T> = Result<T, OperoError>;
