pub mod server;
pub mod tracing;

use std::env;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Application environment
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development, // Local dev or docker-compose
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Name and version of the running binary, reported by `/health`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Build an [`AppInfo`] from the calling crate's Cargo metadata.
#[macro_export]
macro_rules! app_info {
    () => {
        $crate::AppInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    };
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Helper to load and parse environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable into `T`, falling back to `default` when unset
pub fn env_parse_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
