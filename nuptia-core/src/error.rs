//! Error types for nuptia-core

use thiserror::Error;

/// Main error type for the nuptia-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Wedding not found
    #[error("wedding not found: {0}")]
    WeddingNotFound(String),
}

/// Result type alias for nuptia-core
pub type Result<T> = std::result::Result<T, Error>;
