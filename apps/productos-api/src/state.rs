//! Application state management

use database::mongodb::{Client, Database};

use crate::config::Config;

/// Live MongoDB handles, present only for the mongodb store
#[derive(Clone)]
pub struct MongoState {
    pub client: Client,
    pub db: Database,
    pub collection: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub mongo: Option<MongoState>,
}
