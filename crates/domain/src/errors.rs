//! Error types used throughout the client

use thiserror::Error;

use crate::entity::Operation;

/// Main error type for Kelvin client operations
///
/// Server-reported variants (`NoObject`, `InvalidRequest`, `ServerError`)
/// carry the HTTP reason phrase, status code and URL of the failed call.
/// `InvalidRequest` is also used for client-side search validation, in which
/// case those fields are `None`.
#[derive(Error, Debug)]
pub enum KelvinError {
    #[error("{message}")]
    NoObject {
        message: String,
        reason: Option<String>,
        status: Option<u16>,
        url: Option<String>,
    },

    #[error("{message}")]
    InvalidRequest {
        message: String,
        reason: Option<String>,
        status: Option<u16>,
        url: Option<String>,
    },

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("{message}")]
    ServerError {
        message: String,
        reason: Option<String>,
        status: Option<u16>,
        url: Option<String>,
    },

    /// Local precondition failed before any request was made.
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Object is in a lifecycle state that does not permit the operation.
    #[error("Invalid state: {0}")]
    State(String),

    #[error("Session is closed.")]
    SessionClosed,

    #[error("{entity} objects do not support the '{operation}' operation")]
    Unsupported { entity: &'static str, operation: Operation },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl KelvinError {
    /// Client-side validation failure surfaced as `InvalidRequest`.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest { message: message.into(), reason: None, status: None, url: None }
    }

    /// HTTP status code of a server-reported error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NoObject { status, .. }
            | Self::InvalidRequest { status, .. }
            | Self::ServerError { status, .. } => *status,
            _ => None,
        }
    }

    /// HTTP reason phrase of a server-reported error.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::NoObject { reason, .. }
            | Self::InvalidRequest { reason, .. }
            | Self::ServerError { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    /// URL of the request that failed.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::NoObject { url, .. }
            | Self::InvalidRequest { url, .. }
            | Self::ServerError { url, .. } => url.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoObject { .. })
    }

    /// Whether the error was reported by the server, as opposed to a local
    /// precondition or transport failure.
    pub fn is_server_reported(&self) -> bool {
        self.status().is_some()
    }
}

impl From<serde_json::Error> for KelvinError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for Kelvin client operations
pub type Result<T> = std::result::Result<T, KelvinError>;
