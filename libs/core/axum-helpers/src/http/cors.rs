use axum::http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Creates a CORS layer for the configured origins.
///
/// Origins that are not valid header values are skipped with a warning.
/// Returns `None` when nothing usable is left, so callers can leave CORS off.
///
/// The layer allows:
/// - GET, POST, PUT, DELETE, OPTIONS
/// - Content-Type and Accept headers
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .max_age(Duration::from_secs(3600)),
    )
}
