use std::env;
use std::time::Duration;

use crate::auth::DEFAULT_BCRYPT_COST;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} must be a number, got {1:?}")]
    NotANumber(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    /// Origin allowed by CORS. Any origin when unset.
    pub cors_origin: Option<String>,
    pub token_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
    pub db_max_connections: u32,
    /// Upper bound on a single store call, pool acquisition included.
    pub store_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: number(&lookup, "SERVER_PORT", 5000)?,
            cors_origin: lookup("CORS_ORIGIN").filter(|origin| !origin.is_empty()),
            token_ttl: chrono::Duration::seconds(number(&lookup, "TOKEN_TTL_SECS", 3600)?),
            bcrypt_cost: number(&lookup, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?,
            db_max_connections: number(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            store_timeout: Duration::from_millis(number(&lookup, "STORE_TIMEOUT_MS", 5000)?),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn number<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::NotANumber(key, raw)),
        None => Ok(default),
    }
}
