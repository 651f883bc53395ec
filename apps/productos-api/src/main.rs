//! Productos API - REST catalogue server

use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod app;
mod config;
mod openapi;
mod state;

use config::{Config, StoreConfig};
use state::{AppState, MongoState};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Product store: {}", config.store);

    let mongo = match &config.store {
        StoreConfig::MongoDb {
            mongodb,
            collection,
        } => {
            info!("Connecting to MongoDB at {}", mongodb.redacted_url());

            let client = database::mongodb::connect_from_config_with_retry(mongodb, None).await?;
            let db = client.database(mongodb.database());

            info!(
                "Successfully connected to MongoDB database: {}",
                mongodb.database()
            );

            Some(MongoState {
                client,
                db,
                collection: collection.clone(),
            })
        }
        StoreConfig::Memory => {
            info!("Using in-memory product store; data is lost on restart");
            None
        }
    };

    let state = AppState { config, mongo };

    api::init_indexes(&state).await?;

    let router = app::build_router(&state);

    info!(
        "Starting {} v{} on port {}",
        state.config.app.name, state.config.app.version, state.config.server.port
    );

    let server_config = state.config.server.clone();
    let mongo = state.mongo;
    create_production_app(router, &server_config, Duration::from_secs(30), async move {
        if let Some(mongo) = mongo {
            info!("Shutting down: closing MongoDB connections");
            mongo.client.shutdown().await;
            info!("MongoDB connection closed");
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Productos API shutdown complete");
    Ok(())
}
