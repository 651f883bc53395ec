use mongodb::{Database, bson::doc};
use std::time::Instant;

/// Outcome of a MongoDB health probe
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Error text when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Ping `db` and report latency and any error message.
pub async fn check_health_detailed(db: &Database) -> HealthStatus {
    let start = Instant::now();
    let result = db.run_command(doc! { "ping": 1 }).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => {
            tracing::warn!(error = %e, "MongoDB health check failed");
            HealthStatus {
                healthy: false,
                message: Some(e.to_string()),
                response_time_ms,
            }
        }
    }
}
