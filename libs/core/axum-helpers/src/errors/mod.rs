pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response body.
///
/// `error` always carries the human-readable message, so clients can show it
/// as is. `code` is the machine identifier for programmatic handling.
///
/// ```json
/// {
///   "error": "Producto no encontrado",
///   "code": "NOT_FOUND"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Machine-readable error identifier
    pub code: ErrorCode,
    /// Optional structured details (e.g. per-field validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(e) => json_rejection_status(e),
            AppError::ValidationError(_) | AppError::BadRequest(_) | AppError::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Malformed or mistyped bodies are client errors; keep 413/415 as axum reports them.
fn json_rejection_status(rejection: &JsonRejection) -> StatusCode {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            StatusCode::BAD_REQUEST
        }
        other => other.status(),
    }
}

/// Comma-separated list of the fields that failed validation, sorted.
fn invalid_fields(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
    fields.sort_unstable();
    fields.join(", ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidJson.code(),
                    "JSON extraction error: {}",
                    e.body_text()
                );
                ErrorResponse::new(
                    ErrorCode::InvalidJson,
                    format!("{}: {}", ErrorCode::InvalidJson.default_message(), e.body_text()),
                )
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                ErrorResponse {
                    error: format!("Datos inválidos en: {}", invalid_fields(&e)),
                    code: ErrorCode::ValidationError,
                    details: serde_json::to_value(&e).ok(),
                }
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Bad request: {}", msg);
                ErrorResponse::new(ErrorCode::ValidationError, msg)
            }
            AppError::InvalidId(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidId.code(), "Invalid id: {}", msg);
                ErrorResponse::new(ErrorCode::InvalidId, msg)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                ErrorResponse::new(ErrorCode::NotFound, msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                // Internal details stay in the logs.
                ErrorResponse::new(
                    ErrorCode::InternalError,
                    ErrorCode::InternalError.default_message(),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Build an error response without going through [`AppError`].
pub fn error_response(status: StatusCode, message: impl Into<String>, code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(code, message))).into_response()
}
