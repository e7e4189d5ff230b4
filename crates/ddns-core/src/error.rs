//! Error types for the DDNS update endpoint
//!
//! Every failure in the request pipeline is one of these variants. The
//! request handler is the only place that turns them into HTTP responses,
//! using [`Error::status_code`] and [`Error::public_message`].

use http::StatusCode;
use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS update endpoint
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed credentials, or a token the provider rejected
    #[error("{0}")]
    Unauthenticated(String),

    /// A required query parameter is missing
    #[error("{0}")]
    InvalidInput(String),

    /// The credential cannot see any zone
    #[error("{0}")]
    NoZones(String),

    /// More than one remote record matches a desired (name, type) pair
    #[error("{0}")]
    Conflict(String),

    /// The request cannot be served in this execution context
    #[error("{0}")]
    ServerError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport errors (from provider APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an authentication error
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a "no zones" error
    pub fn no_zones(msg: impl Into<String>) -> Self {
        Self::NoZones(msg.into())
    }

    /// Create a record conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a server-side error with a caller-visible message
    pub fn server(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Error::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NoZones(_) | Error::Conflict(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that may be shown to the caller
    ///
    /// Returns `None` for unclassified failures, whose detail stays in the
    /// server log.
    pub fn public_message(&self) -> Option<String> {
        match self {
            Error::Unauthenticated(msg)
            | Error::InvalidInput(msg)
            | Error::NoZones(msg)
            | Error::Conflict(msg)
            | Error::ServerError(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
