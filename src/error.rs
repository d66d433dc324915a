//! Error types for elastic-mcp.
//!
//! Uses thiserror for ergonomic error handling with proper
//! error chain propagation. Every failure a tool can hit is funnelled
//! into [`ServerError`] before it is rendered as tool output.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level server error.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Startup configuration errors. Fatal before the server is built.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Elasticsearch URL is required (--url or ES_URL)")]
    MissingUrl,

    #[error("Invalid Elasticsearch URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Either an API key (ES_API_KEY) or a username and password (ES_USERNAME/ES_PASSWORD) is required")]
    MissingCredentials,

    #[error("Basic authentication needs both a username and a password")]
    IncompleteBasicAuth,

    #[error("Failed to read CA certificate {path}: {source}")]
    CaCertRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CA certificate {path}: {reason}")]
    CaCertInvalid { path: PathBuf, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Backend failures, normalized at the HTTP boundary into a single shape
/// with a human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced a response (connect, TLS, I/O).
    #[error("Connection error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Elasticsearch returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Result type alias for backend calls.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

// Error code implementations for machine-readable error responses
impl ServerError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Backend(e) => e.code(),
            Self::Json(_) => "JSON_ERROR",
        }
    }
}

impl ConfigError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingUrl => "MISSING_URL",
            Self::InvalidUrl { .. } => "INVALID_URL",
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::IncompleteBasicAuth => "INCOMPLETE_BASIC_AUTH",
            Self::CaCertRead { .. } => "CA_CERT_READ_ERROR",
            Self::CaCertInvalid { .. } => "CA_CERT_INVALID",
            Self::Client(_) => "CLIENT_BUILD_ERROR",
        }
    }
}

impl BackendError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Status { status: 404, .. } => "NOT_FOUND",
            Self::Status { .. } => "BACKEND_STATUS",
            Self::Decode(_) => "DECODE_ERROR",
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
