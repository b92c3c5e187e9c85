//! HTTP error handling and response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::repository::RepositoryError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// API error response body.
///
/// `error` repeats `message`; older clients read one key or the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code for programmatic handling
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,
    /// Human-readable error message
    #[schema(example = "tour_id is required for insert")]
    pub message: String,
    #[schema(example = "tour_id is required for insert")]
    pub error: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code.into(),
            error: message.clone(),
            message,
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Body could not be read as JSON
    BadRequest(String),
    /// Request was well-formed but failed validation
    Validation(String),
    /// Request clashes with stored state
    Conflict(String),
    /// Body was refused before parsing (size limit, content type)
    Rejection(StatusCode, String),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ApiError) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("VALIDATION_ERROR", msg),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ApiError::new("CONFLICT", msg)),
            AppError::Rejection(status, msg) => {
                let code = match status {
                    StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
                    StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
                    _ => "BAD_REQUEST",
                };
                (status, ApiError::new(code, msg))
            }
            AppError::Repository(e) => match e {
                RepositoryError::ValidationError { message, .. } => {
                    AppError::Validation(message).status_and_body()
                }
                RepositoryError::NotFound { message, .. } => {
                    AppError::NotFound(message).status_and_body()
                }
                RepositoryError::Conflict { message, .. } => {
                    AppError::Conflict(message).status_and_body()
                }
                other => {
                    tracing::error!(error = %other, "repository operation failed");
                    internal()
                }
            },
        }
    }
}

fn internal() -> (StatusCode, ApiError) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiError::new("INTERNAL_ERROR", INTERNAL_MESSAGE),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_body();
        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

/// Unparseable or mistyped JSON is a plain 400; refusals such as an
/// oversized body or a missing content type keep their own status.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                AppError::BadRequest(rejection.body_text())
            }
            _ => AppError::Rejection(rejection.status(), rejection.body_text()),
        }
    }
}
