// Protocol error taxonomy

use serde::{Deserialize, Serialize};

/// Machine-readable code carried by failure envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    UnknownTool,
    UnknownMethod,
    Validation,
    HandlerFault,
}

impl ErrorCode {
    /// HTTP status used when the envelope travels over HTTP.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UnknownTool | Self::UnknownMethod | Self::Validation => 400,
            Self::HandlerFault => 500,
        }
    }
}

/// Errors raised while validating or dispatching a request.
///
/// None of these cross the wire as errors: the server turns each one into a
/// failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum McpError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Invalid params: {0}")]
    Validation(String),

    #[error("Tool {tool} failed: {message}")]
    HandlerFault { tool: String, message: String },

    #[error("Failed to encode {method} result: {message}")]
    Encode { method: String, message: String },
}

impl McpError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn handler_fault(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HandlerFault {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn encode(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encode {
            method: method.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownTool(_) => ErrorCode::UnknownTool,
            Self::UnknownMethod(_) => ErrorCode::UnknownMethod,
            Self::Validation(_) => ErrorCode::Validation,
            Self::HandlerFault { .. } | Self::Encode { .. } => ErrorCode::HandlerFault,
        }
    }
}
