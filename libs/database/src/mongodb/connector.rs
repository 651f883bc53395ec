use mongodb::{Client, bson::doc, options::ClientOptions};
use tracing::{info, instrument};

use super::MongoConfig;
use crate::common::{RetryConfig, retry_with_backoff};

/// Error type for MongoDB connection setup
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Parse the connection string and apply pool/timeout settings from `config`.
pub async fn client_options(config: &MongoConfig) -> Result<ClientOptions, MongoError> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(config.connect_timeout);
    options.server_selection_timeout = Some(config.server_selection_timeout);
    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    Ok(options)
}

/// Connect and verify the server answers a `ping` on the configured database.
#[instrument(skip(config), fields(url = %config.redacted_url(), database = %config.database))]
pub async fn connect_from_config(config: &MongoConfig) -> Result<Client, MongoError> {
    let client = Client::with_options(client_options(config).await?)?;

    // The driver connects lazily; force a round trip so startup fails fast.
    client
        .database(&config.database)
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// [`connect_from_config`] with exponential backoff, for containers that
/// start before the database is reachable.
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> Result<Client, MongoError> {
    retry_with_backoff(
        || connect_from_config(config),
        retry_config.unwrap_or_default(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_client_options_apply_config() {
        let config = MongoConfig::with_database("mongodb://localhost:27017", "tienda")
            .with_pool_size(12, 3)
            .with_app_name("productos-api");

        let options = client_options(&config).await.unwrap();
        assert_eq!(options.max_pool_size, Some(12));
        assert_eq!(options.min_pool_size, Some(3));
        assert_eq!(options.connect_timeout, Some(Duration::from_secs(10)));
        assert_eq!(options.app_name.as_deref(), Some("productos-api"));
    }

    #[tokio::test]
    async fn test_client_options_reject_bad_scheme() {
        let config = MongoConfig::new("postgres://localhost:5432");
        assert!(client_options(&config).await.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_connect_from_config() {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let config = MongoConfig::with_database(url, "test");
        assert!(connect_from_config(&config).await.is_ok());
    }
}
