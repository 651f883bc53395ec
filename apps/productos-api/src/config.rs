//! Configuration for the Productos API

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_productos::mongodb::DEFAULT_COLLECTION;
use std::fmt;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Which repository backs the API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreKind {
    MongoDb,
    Memory,
}

#[derive(Clone, Debug)]
pub enum StoreConfig {
    MongoDb {
        mongodb: MongoConfig,
        collection: String,
    },
    Memory,
}

impl FromEnv for StoreConfig {
    /// - `PRODUCTOS_STORE`: `mongodb` (default) or `memory`
    /// - `PRODUCTOS_COLLECTION`: collection name (default `productos`)
    /// - `MONGODB_*`: see [`MongoConfig`], only read for the mongodb store
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env_or_default("PRODUCTOS_STORE", "mongodb");
        let kind: StoreKind = raw.trim().parse().map_err(|_| ConfigError::ParseError {
            key: "PRODUCTOS_STORE".to_string(),
            details: format!("expected 'mongodb' or 'memory', got '{raw}'"),
        })?;

        Ok(match kind {
            StoreKind::MongoDb => StoreConfig::MongoDb {
                mongodb: MongoConfig::from_env()?
                    .with_app_name(env_or_default("MONGODB_APP_NAME", "productos-api")),
                collection: env_or_default("PRODUCTOS_COLLECTION", DEFAULT_COLLECTION),
            },
            StoreKind::Memory => StoreConfig::Memory,
        })
    }
}

/// Log-safe summary: credentials in the connection string are masked
impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfig::MongoDb {
                mongodb,
                collection,
            } => write!(
                f,
                "mongodb {} db={} collection={}",
                mongodb.redacted_url(),
                mongodb.database(),
                collection
            ),
            StoreConfig::Memory => f.write_str("memory"),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            server: ServerConfig::from_env()?,
            store: StoreConfig::from_env()?,
            environment: Environment::from_env(),
        })
    }
}
