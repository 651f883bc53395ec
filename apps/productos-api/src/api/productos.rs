//! Productos API routes

use axum::Router;
use domain_productos::{
    InMemoryProductRepository, MongoProductRepository, ProductService, handlers,
};

use crate::state::AppState;

/// Create the productos router over the configured store
pub fn router(state: &AppState) -> Router {
    match &state.mongo {
        Some(mongo) => {
            let repository = MongoProductRepository::with_collection(&mongo.db, &mongo.collection);
            handlers::router(ProductService::new(repository))
        }
        None => handlers::router(ProductService::new(InMemoryProductRepository::new())),
    }
}

/// Create the unique index on `codigo`; nothing to do for the memory store
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    if let Some(mongo) = &state.mongo {
        let repository = MongoProductRepository::with_collection(&mongo.db, &mongo.collection);
        repository.init_indexes().await?;
    }
    Ok(())
}
