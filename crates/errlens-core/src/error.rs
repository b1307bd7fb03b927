//! Error types for errlens-core

use thiserror::Error;

/// Diagnosis error type
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid credential, raised before any network call
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport, authentication, rate-limit or non-success response
    #[error("remote service error: {0}")]
    RemoteService(String),

    /// Error text was empty after trimming
    #[error("error text is empty")]
    EmptyInput,
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a remote service error
    #[must_use]
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteService(msg.into())
    }

    /// Get error code for logs and protocol messages
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::RemoteService(_) => "remote_service_error",
            Self::EmptyInput => "empty_input",
        }
    }
}

impl From<errlens_llm::Error> for Error {
    fn from(err: errlens_llm::Error) -> Self {
        match err {
            errlens_llm::Error::NotConfigured(msg) => Self::Configuration(msg),
            other => Self::RemoteService(other.to_string()),
        }
    }
}

/// Result type alias for diagnosis operations
pub type Result<T> = std::result::Result<T, Error>;
