use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use core_config::AppInfo;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::future::Future;
use std::pin::Pin;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// Body of `/ready`: overall status plus one entry per dependency.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// `ready` or `not ready`
    pub status: String,
    /// `connected` or `disconnected`
    pub database: String,
}

/// A boxed future for health checks with a string error
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Runs health checks concurrently and aggregates them into one JSON body.
///
/// Each check shows up as `"<name>": "connected" | "disconnected"`. The
/// result is `Err` with 503 when any check fails.
///
/// # Example
/// ```ignore
/// let checks: Vec<(&str, HealthCheckFuture)> = vec![(
///     "database",
///     Box::pin(async move { ping(&db).await.map_err(|e| e.to_string()) }),
/// )];
/// run_health_checks(checks).await
/// ```
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let names: Vec<_> = checks.iter().map(|(name, _)| *name).collect();
    let futures: Vec<_> = checks.into_iter().map(|(_, check)| check).collect();
    let results = join_all(futures).await;

    let mut body = Map::new();
    let mut all_healthy = true;

    for (name, result) in names.into_iter().zip(results) {
        let status = match result {
            Ok(()) => "connected",
            Err(e) => {
                tracing::error!(check = name, error = %e, "Readiness check failed");
                all_healthy = false;
                "disconnected"
            }
        };
        body.insert(name.to_string(), json!(status));
    }

    body.insert(
        "status".to_string(),
        json!(if all_healthy { "ready" } else { "not ready" }),
    );

    if all_healthy {
        Ok((StatusCode::OK, Json(Value::Object(body))))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(Value::Object(body))))
    }
}

/// Liveness handler: 200 with name and version while the process is up.
pub async fn health_handler(State(app): State<AppInfo>) -> Response {
    let response = HealthResponse {
        status: "healthy",
        name: app.name,
        version: app.version,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Creates a router with the /health endpoint.
///
/// # Example
/// ```ignore
/// use axum_helpers::server::health_router;
/// use core_config::app_info;
///
/// let app = router.merge(health_router(app_info!()));
/// ```
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info)
}
