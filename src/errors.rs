//! Error types for the payssion-rs library.
//!
//! Every failure a call can produce is funnelled into [`PayssionError`], so callers
//! only ever match on one type.

use thiserror::Error;

/// Main error type for Payssion operations.
#[derive(Error, Debug)]
pub enum PayssionError {
    /// Client configuration is incomplete (e.g. missing credentials)
    #[error("{0}")]
    Config(String),

    /// A precondition failed before any network activity
    #[error("{0}")]
    Validation(String),

    /// The gateway answered with one of the well-known failure statuses
    #[error("Response Http Error - {phrase}")]
    HttpStatus {
        /// Numeric HTTP status
        status: u16,
        /// Canonical status line, e.g. "503 Service Unavailable"
        phrase: &'static str,
    },

    /// The request never produced a usable response
    #[error("Unable to connect to {url}. Error: {message}")]
    Transport {
        /// Base URL configured at the time of the call
        url: String,
        /// Message of the underlying failure
        message: String,
    },

    /// The response body could not be decoded as JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PayssionError {
    /// Shorthand for a [`PayssionError::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        PayssionError::Validation(message.into())
    }

    /// Shorthand for a [`PayssionError::Config`] with the given message.
    pub fn config(message: impl Into<String>) -> Self {
        PayssionError::Config(message.into())
    }

    /// Returns true if the error was raised before anything went on the wire.
    pub fn is_pre_flight(&self) -> bool {
        matches!(self, PayssionError::Config(_) | PayssionError::Validation(_))
    }
}

/// Result type alias for Payssion operations.
pub type Result<T> = std::result::Result<T, PayssionError>;
