use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{cors::create_cors_layer, security::security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable as RedocServable};
use utoipa_scalar::{Scalar, Servable as ScalarServable};

/// Path of the generated OpenAPI document
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Wraps the API routes with documentation and cross-cutting middleware.
///
/// - API routes nested under `/api`
/// - `ops` routes (health, readiness) merged at the root
/// - OpenAPI JSON at [`OPENAPI_JSON_PATH`], plus ReDoc, RapiDoc and Scalar UIs
/// - JSON 404 fallback for unmatched routes
/// - Request tracing, security headers and response compression
/// - CORS, only when `server_config.cors_allowed_origins` has usable entries
///
/// Every route, `ops` included, gets the same middleware stack.
///
/// # Example
/// ```ignore
/// let api_routes = Router::new().nest("/productos", productos_router);
/// let ops = health_router(app_info!()).merge(ready_router);
///
/// let router = create_router::<ApiDoc>(api_routes, ops, &config.server);
/// ```
pub fn create_router<T>(apis: Router, ops: Router, server_config: &ServerConfig) -> Router
where
    T: OpenApi + 'static,
{
    let router = Router::new()
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::with_openapi(OPENAPI_JSON_PATH, T::openapi()).path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .merge(ops)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    let router = match create_cors_layer(&server_config.cors_allowed_origins) {
        Some(cors) => {
            info!(
                origins = ?server_config.cors_allowed_origins,
                "CORS enabled"
            );
            router.layer(cors)
        }
        None => router,
    };

    // gzip, br, deflate or zstd, negotiated from Accept-Encoding
    router.layer(CompressionLayer::new())
}

/// Serves `router` until a shutdown signal, then runs `cleanup` within `shutdown_timeout`.
///
/// In-flight requests drain before this returns. A cleanup that overruns the
/// timeout is abandoned with a warning.
///
/// # Example
/// ```ignore
/// let cleanup = async move {
///     client.shutdown().await;
/// };
///
/// create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::default();
    let cleanup_signal = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        cleanup_signal.wait_for_shutdown().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(()) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { coordinator.wait_for_signal().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    if serve_result.is_ok() {
        cleanup_handle.await.ok();
    } else {
        cleanup_handle.abort();
    }

    serve_result
}
