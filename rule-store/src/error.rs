//! Error types for rule stores

use thiserror::Error;

/// Result type for rule store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Rule store errors
#[derive(Error, Debug)]
pub enum Error {
    /// Backing store unreachable
    #[error("Connection error: {0}")]
    Connection(String),

    /// Requested tab does not exist
    #[error("Tab not found: {0}")]
    TabNotFound(String),

    /// Backing API answered with an error status
    #[error("Rule store API error {status_code}: {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
