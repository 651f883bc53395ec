//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::mongodb::check_health_detailed;
use serde_json::Value;

use crate::state::AppState;

type ReadyResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

/// 200 `{status: "ready", database: "connected"}` or 503 with `"disconnected"`
async fn ready(State(state): State<AppState>) -> ReadyResult {
    let database: HealthCheckFuture = match state.mongo {
        Some(mongo) => Box::pin(async move {
            let status = check_health_detailed(&mongo.db).await;
            match status.message {
                None => Ok(()),
                Some(message) => Err(message),
            }
        }),
        // The in-memory store is always reachable.
        None => Box::pin(async { Ok(()) }),
    };

    run_health_checks(vec![("database", database)]).await
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
