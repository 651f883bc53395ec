use crate::{env_or_default, env_parse_or, ConfigError, FromEnv};
use std::net::Ipv4Addr;

const DEFAULT_PORT: u16 = 3000;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. Empty means no CORS layer is installed.
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - HOST: defaults to 0.0.0.0 (all interfaces)
    /// - PORT: defaults to 3000
    /// - CORS_ALLOWED_ORIGIN: comma-separated, optional
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse_or("PORT", DEFAULT_PORT)?;

        let cors_allowed_origins = env_or_default("CORS_ALLOWED_ORIGIN", "")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: DEFAULT_PORT,
            cors_allowed_origins: Vec::new(),
        }
    }
}
