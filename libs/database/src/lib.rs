//! Database connectors shared by the productos services
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connection management and health checks
//! - `config` - `core_config::FromEnv` support for [`mongodb::MongoConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{connect_from_config_with_retry, MongoConfig};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "tienda");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{RetryConfig, retry_with_backoff};
