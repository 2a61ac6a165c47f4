//! API errors and their JSON rendering

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use docassist_extract::ExtractError;
use docassist_improve::ImproveError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error body: `{"error": {"message", "type", "code"}}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: &'static str,
    pub code: &'static str,
}

/// Why turning an upload into an improvement failed
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Improve(#[from] ImproveError),

    #[error("extraction task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Failed to process document: {0}")]
    Processing(#[from] ProcessingError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, r#type, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error", "bad_request"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "authentication_error", "invalid_token"),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "invalid_credentials",
            ),
            ApiError::Processing(cause) => {
                error!(error = ?cause, "Document processing failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error", "processing_failed")
            }
            ApiError::Internal(detail) => {
                error!(detail, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error", "internal_error")
            }
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                message: self.to_string(),
                r#type,
                code,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
