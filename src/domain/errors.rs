//! Domain error types
//!
//! This module defines the error hierarchy for Rollcall.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Rollcall error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum RollcallError {
    /// Configuration-related errors (bad credentials, invalid bounds)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Export API errors (HTTP status, transport, response format)
    #[error("Export API error: {0}")]
    ExportApi(#[from] ExportApiError),

    /// Caller supplied an unusable search input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A point lookup exhausted every page without a match
    #[error("Registration not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl RollcallError {
    /// Whether an outer caller may retry the failed operation with its own policy.
    ///
    /// Only an exhausted rate limit (HTTP 429) qualifies. Rollcall itself never
    /// retries past its configured budget.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RollcallError::ExportApi(ExportApiError::RateLimited { .. }))
    }

    /// HTTP status behind the failure, when the export API answered
    pub fn http_status(&self) -> Option<u16> {
        match self {
            RollcallError::ExportApi(api) => api.status(),
            _ => None,
        }
    }

    /// Whether the error means "nothing to return" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RollcallError::NotFound(_) | RollcallError::ExportApi(ExportApiError::NotFound(_))
        )
    }
}

/// Export API errors
///
/// Errors that occur when interacting with the registration export API.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum ExportApiError {
    /// Network failure that outlived the retry budget
    #[error("Failed to connect to export API: {0}")]
    ConnectionFailed(String),

    /// HTTP 401/403
    #[error("Authorization failed: {status} - {message}")]
    Unauthorized { status: u16, message: String },

    /// HTTP 400/422
    #[error("Invalid request: {status} - {message}")]
    InvalidInput { status: u16, message: String },

    /// HTTP 404
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// HTTP 429 after the retry budget was spent
    #[error("Rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// Server error (5xx) after the retry budget was spent
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Any other non-success status
    #[error("Unexpected status: {status} - {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Shutdown requested while waiting to retry
    #[error("Interrupted: {0}")]
    Interrupted(String),

    /// Response body could not be parsed
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ExportApiError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ExportApiError::Unauthorized { status, .. }
            | ExportApiError::InvalidInput { status, .. }
            | ExportApiError::ServerError { status, .. }
            | ExportApiError::UnexpectedStatus { status, .. } => Some(*status),
            ExportApiError::NotFound(_) => Some(404),
            ExportApiError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RollcallError {
    fn from(err: std::io::Error) -> Self {
        RollcallError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RollcallError {
    fn from(err: serde_json::Error) -> Self {
        RollcallError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RollcallError {
    fn from(err: toml::de::Error) -> Self {
        RollcallError::Configuration(format!("TOML parse error: {err}"))
    }
}
