//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Signing key used when `JWT_SECRET` is unset. Fine for local development only.
pub const DEV_JWT_SECRET: &str = "sweetshop-dev-secret-change-in-production";

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// Interface to bind
    pub bind_addr: String,

    /// SQLite database file
    pub database_path: String,

    /// Upper bound on pooled SQLite connections
    pub database_max_connections: u32,

    /// JWT secret key for signing tokens
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Bearer token lifetime in seconds
    pub jwt_expires_in_secs: i64,

    /// Allowed browser origin; `*` allows any
    pub cors_origin: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            port: 5000,
            bind_addr: "0.0.0.0".to_string(),
            database_path: "./sweetshop.db".to_string(),
            database_max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expires_in_secs: 86_400, // 24 hours
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let config = ApiConfig {
            port: parse_var("PORT", defaults.port)?,
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_path: env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            database_max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            jwt_secret,
            jwt_expires_in_secs: parse_var("JWT_EXPIRES_IN_SECS", defaults.jwt_expires_in_secs)?,
            cors_origin: env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
        };

        if config.jwt_expires_in_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_EXPIRES_IN_SECS".to_string()));
        }
        if config.database_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Socket address the server listens on.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BIND_ADDR".to_string()))
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
