//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, health checks, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers)
//! - **[`errors`]**: `{ "error": ... }` responses with error codes
//! - **[`extractors`]**: ObjectId path and JSON body extractors
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ServerConfig::default();
//!     let router = create_router::<ApiDoc>(Router::new(), health_router(app_info!()), &config);
//!     create_production_app(router, &config, Duration::from_secs(30), async {}).await
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ReadyResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{JsonBody, ObjectIdPath};
