//! API routes module

pub mod health;
pub mod productos;

use axum::Router;

use crate::state::AppState;

/// Routes served under `/api`
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/productos", productos::router(state))
}

/// Root-level operational routes: `/health` and `/ready`
pub fn ops_routes(state: &AppState) -> Router {
    axum_helpers::health_router(state.config.app).merge(health::router(state.clone()))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    productos::init_indexes(state).await
}
