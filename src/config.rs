use std::time::Duration;

use thiserror::Error;

use crate::domain::basket::GUEST_USER;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Postgres URL. Without one, state is kept in process memory.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Owner of the basket opened at startup.
    pub user_id: String,
    pub db_connect_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: "PORT",
                value: v,
            })?,
            None => 8080,
        };
        let timeout_secs: u64 = match non_empty("DB_CONNECT_TIMEOUT_SECS") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: "DB_CONNECT_TIMEOUT_SECS",
                value: v,
            })?,
            None => 5,
        };

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            user_id: non_empty("STOREFRONT_USER").unwrap_or_else(|| GUEST_USER.to_string()),
            db_connect_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
