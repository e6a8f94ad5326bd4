use serde_json::json;
use thiserror::Error;

use super::models::UpstreamErrorBody;
use crate::presentation::middleware::error::ApiError;

/// Failures talking to the Clash Royale API
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpstreamError {
    /// The API answered with a non-success status
    #[error("Clash Royale API responded with {status}: {}", .body.display_message())]
    Status { status: u16, body: UpstreamErrorBody },

    /// The request or its response body failed in transit (connection failure or timeout)
    #[error("Unable to reach Clash Royale API: {message}")]
    Unreachable { message: String },

    /// A success response whose body was not valid JSON
    #[error("Invalid response from Clash Royale API: {0}")]
    InvalidResponse(String),

    #[error("Upstream client configuration error: {0}")]
    Configuration(String),
}

impl UpstreamError {
    pub fn status(status: u16, body: UpstreamErrorBody) -> Self {
        Self::Status { status, body }
    }

    pub fn unreachable(err: &reqwest::Error) -> Self {
        Self::Unreachable { message: err.to_string() }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, body } => {
                let message = body.display_message();
                let details = body.details();
                match status {
                    400 => ApiError::BadRequest { message, details },
                    403 => ApiError::Forbidden { message, details },
                    404 => ApiError::NotFound { message, details },
                    429 => ApiError::TooManyRequests { message, details },
                    503 => ApiError::ServiceUnavailable { message, details },
                    _ => ApiError::Internal { message, details },
                }
            }
            UpstreamError::Unreachable { message } => ApiError::ServiceUnavailable {
                message: "Unable to reach Clash Royale API".to_string(),
                details: Some(json!({ "originalError": message })),
            },
            UpstreamError::InvalidResponse(message) => ApiError::Internal {
                message: "Invalid response from Clash Royale API".to_string(),
                details: Some(json!({ "originalError": message })),
            },
            UpstreamError::Configuration(message) => ApiError::internal(message),
        }
    }
}
