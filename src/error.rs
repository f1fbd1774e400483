//! Error types for oriel

use thiserror::Error;

/// Result type for oriel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for oriel
#[derive(Debug, Error)]
pub enum Error {
    /// No live webview (or window/websession) with the given id
    #[error("Not found: {0}")]
    NotFound(String),

    /// A parameter or option was malformed or out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation requires a precondition the webview does not meet
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The underlying rendering engine reported a failure
    #[error("Engine error in {operation}: {message}")]
    Engine { operation: String, message: String },

    /// A host-enforced call deadline elapsed
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a not-found error for a webview id
    pub fn webview_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("no webview with id {id}"))
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an invalid-state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Create an engine error with operation context
    pub fn engine(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Engine {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
