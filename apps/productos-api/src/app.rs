//! Router assembly

use axum::Router;
use axum_helpers::create_router;

use crate::api;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Full application router: `/api/productos`, `/health`, `/ready`, docs and fallback
pub fn build_router(state: &AppState) -> Router {
    create_router::<ApiDoc>(
        api::routes(state),
        api::ops_routes(state),
        &state.config.server,
    )
}
