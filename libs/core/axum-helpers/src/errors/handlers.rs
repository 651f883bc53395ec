use axum::{http::StatusCode, response::Response};

use super::{ErrorCode, error_response};

/// Fallback for unmatched routes: 404 with the standard error body.
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::NotFound.default_message(),
        ErrorCode::NotFound,
    )
}
