//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main error type for the syncer
///
/// Wraps the more specific error types and carries enough context for the
/// orchestrator to log and count a failure without aborting the run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Google Drive related errors
    #[error("Drive error: {0}")]
    Drive(#[from] DriveError),

    /// Ledger persistence errors
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Validation errors (malformed remote payloads, bad identifiers)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Google Drive specific errors
///
/// Errors that occur when listing or downloading remote documents.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum DriveError {
    /// Could not reach the Drive API at all
    #[error("Failed to connect to Google Drive: {0}")]
    ConnectionFailed(String),

    /// Credentials missing, expired or rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// File or folder not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl DriveError {
    /// Whether the error indicates the network itself was unavailable
    pub fn is_connectivity(&self) -> bool {
        matches!(self, DriveError::ConnectionFailed(_) | DriveError::Timeout(_))
    }

    /// Map an HTTP status and body to the matching variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => DriveError::AuthenticationFailed(message),
            404 => DriveError::NotFound(message),
            429 => DriveError::RateLimitExceeded(message),
            500..=599 => DriveError::ServerError { status, message },
            _ => DriveError::ClientError { status, message },
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
