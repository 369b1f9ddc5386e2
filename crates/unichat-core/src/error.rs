//! Error types for unichat-core

use thiserror::Error;

/// Main error type for unichat-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Cannot delete the last remaining session")]
    LastSession,

    #[error("Message not found: {0}")]
    MessageNotFound(u64),

    #[error("Message {0} is not a bot message and cannot be rated")]
    NotRateable(u64),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Backend request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for unichat-core
pub type Result<T> = std::result::Result<T, Error>;
