//! Error types for errlens-session

use thiserror::Error;

/// Session error type
#[derive(Debug, Error)]
pub enum Error {
    /// Inbound message could not be understood
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The surface is gone; posting to it is a no-op
    #[error("surface closed")]
    SurfaceClosed,

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create an invalid message error
    #[must_use]
    pub fn invalid_message(msg: impl Into<String>) -> Self {
        Self::InvalidMessage(msg.into())
    }

    /// Get error code for logs
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidMessage(_) => "invalid_message",
            Self::SurfaceClosed => "surface_closed",
            Self::Serialization(_) => "serialization_error",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, Error>;
