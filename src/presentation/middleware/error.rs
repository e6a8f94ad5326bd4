use axum::{
    BoxError,
    extract::{OriginalUri, rejection::PathRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::domain::value_objects::PlayerTagError;

/// Errors surfaced to API clients.
///
/// Every variant renders as the same envelope:
/// `{"success": false, "error": {"message", "statusCode", "details"?}}`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String, details: Option<Value> },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Forbidden { message: String, details: Option<Value> },

    #[error("{message}")]
    NotFound { message: String, details: Option<Value> },

    #[error("{message}")]
    RequestTimeout { message: String },

    #[error("{message}")]
    TooManyRequests { message: String, details: Option<Value> },

    #[error("{message}")]
    Internal { message: String, details: Option<Value> },

    #[error("{message}")]
    ServiceUnavailable { message: String, details: Option<Value> },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into(), details: None }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { message: message.into(), details: None }
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::TooManyRequests { message: message.into(), details: None }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), details: None }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::RequestTimeout { .. } => StatusCode::REQUEST_TIMEOUT,
            ApiError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Short machine-readable kind, used as a log field
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Unauthorized { .. } => "unauthorized",
            ApiError::Forbidden { .. } => "forbidden",
            ApiError::NotFound { .. } => "not_found",
            ApiError::RequestTimeout { .. } => "request_timeout",
            ApiError::TooManyRequests { .. } => "too_many_requests",
            ApiError::Internal { .. } => "internal",
            ApiError::ServiceUnavailable { .. } => "service_unavailable",
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            ApiError::Unauthorized { .. } | ApiError::RequestTimeout { .. } => None,
            ApiError::BadRequest { details, .. }
            | ApiError::Forbidden { details, .. }
            | ApiError::NotFound { details, .. }
            | ApiError::TooManyRequests { details, .. }
            | ApiError::Internal { details, .. }
            | ApiError::ServiceUnavailable { details, .. } => details.as_ref(),
        }
    }

    /// Server-side failures are logged as errors, client mistakes as warnings
    pub fn should_log_as_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: ErrorBody {
                message: self.to_string(),
                status_code: self.status_code().as_u16(),
                details: self.details().cloned(),
            },
        }
    }
}

/// Uniform error envelope
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.should_log_as_error() {
            error!(
                error_type = self.error_type(),
                status = status.as_u16(),
                details = ?self.details(),
                "Server error: {}",
                self
            );
        } else {
            warn!(
                error_type = self.error_type(),
                status = status.as_u16(),
                "Client error: {}",
                self
            );
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

impl From<PlayerTagError> for ApiError {
    fn from(err: PlayerTagError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(err: PathRejection) -> Self {
        ApiError::bad_request(err.body_text())
    }
}

/// Fallback for routes that do not exist
pub async fn not_found_handler(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(format!("Route not found: {method} {uri}"))
}

/// Error handler for the inbound request timeout layer
pub async fn handle_timeout_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::RequestTimeout { message: "Request timed out".to_string() }
    } else {
        ApiError::internal(format!("Unhandled internal error: {err}"))
    }
}
