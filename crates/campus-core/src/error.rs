//! Error types for campuslink.

use thiserror::Error;

/// Result type alias using campuslink's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for campuslink operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(uuid::Uuid),

    /// Shared resource not found
    #[error("Resource not found: {0}")]
    ResourceNotFound(uuid::Uuid),

    /// Event not found
    #[error("Event not found: {0}")]
    EventNotFound(uuid::Uuid),

    /// Conversation not found
    #[error("Conversation not found: {0}")]
    ConversationNotFound(uuid::Uuid),

    /// Completion-service call failed
    #[error("Assistant error: {0}")]
    Assistant(String),

    /// Search/filter evaluation failed
    #[error("Search error: {0}")]
    Search(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Authentication/authorization failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (authenticated but not authorized)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
