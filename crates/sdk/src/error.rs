//! Error types for the Tessera SDK.

use serde::{Deserialize, Serialize};
use tessera_mcp::protocol::Failure;

/// Result type for SDK operations.
pub type TesseraResult<T> = Result<T, TesseraError>;

/// Error types that can occur when using the Tessera SDK.
#[derive(Debug, thiserror::Error)]
pub enum TesseraError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an error that is not a protocol envelope.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failed for a reason other than HTTP.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server answered, but not with a well-formed envelope.
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Server rejected the request with a failure envelope.
    #[error("Server rejected request: {}", .0.error)]
    Protocol(Failure),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An attempt exceeded its deadline.
    #[error("Request timed out")]
    Timeout,

    /// The caller cancelled the request.
    #[error("Request cancelled")]
    Cancelled,

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl TesseraError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout | Self::Transport(_) | Self::MalformedEnvelope(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create an API error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        // Try to parse as ErrorResponse
        if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(body) {
            Self::Api {
                status,
                message: error_response.error,
            }
        } else {
            Self::Api {
                status,
                message: body.to_string(),
            }
        }
    }
}

/// Plain error body some proxies and frameworks send instead of an envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
