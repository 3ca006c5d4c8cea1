//! Error types for the backdrop watcher
//!
//! Every variant is local and non-fatal to the poll loop: the engine logs it
//! and skips the rest of the current cycle.

use thiserror::Error;

/// Result type alias for backdrop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the backdrop watcher
#[derive(Error, Debug)]
pub enum Error {
    /// State store read/write errors (other than a missing or corrupt file)
    #[error("State store error: {0}")]
    StateStore(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport failure or non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(String),

    /// Webhook answered with something other than the expected status
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code received
        status: u16,
        /// Response body (may be empty)
        body: String,
    },
}

impl Error {
    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an unexpected status error
    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            body: body.into(),
        }
    }
}
