//! Error types for corkboard
//!
//! Defines a single error enum covering transport, HTTP, session and local
//! failures. Uses thiserror for ergonomic error handling.

use crate::retry::RetryableError;
use thiserror::Error;

/// Result type alias for corkboard operations
pub type Result<T> = std::result::Result<T, CorkboardError>;

/// Comprehensive error type for corkboard operations
#[derive(Error, Debug)]
pub enum CorkboardError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection-level failures (DNS, refused, reset, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the transport timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-2xx response from the API
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Refresh failed after a 401; the user must log in again
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// A 2xx response that is neither JSON nor empty, or an empty body where
    /// an entity was expected
    #[error("Unexpected response with status: {status}")]
    UnexpectedResponse { status: u16 },

    /// Local validation failures caught before any request
    #[error("{0}")]
    Validation(String),

    /// A board, list or card missing from local state
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Anyhow errors (for more context)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CorkboardError {
    /// Build an HTTP error from a status code and message
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::UnexpectedResponse { status } => Some(*status),
            Self::SessionExpired => Some(401),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CorkboardError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_decode() {
            Self::Other(format!("Failed to decode response: {}", e))
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl RetryableError for CorkboardError {
    fn is_transient(&self) -> bool {
        match self {
            CorkboardError::Network(_) | CorkboardError::Timeout(_) => true,
            CorkboardError::Http { status, .. } => (500..600).contains(status),
            CorkboardError::Config(_)
            | CorkboardError::SessionExpired
            | CorkboardError::UnexpectedResponse { .. }
            | CorkboardError::Validation(_)
            | CorkboardError::NotFound(_)
            | CorkboardError::Io(_)
            | CorkboardError::Json(_)
            | CorkboardError::Yaml(_)
            | CorkboardError::Other(_)
            | CorkboardError::Anyhow(_) => false,
        }
    }
}
