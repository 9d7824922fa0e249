use std::env;

use chrono::Duration;
use thiserror::Error;

const DEFAULT_TOKEN_HOURS: i64 = 24;
/// One year. Keeps `iat + ttl` well inside chrono's date range.
const MAX_TOKEN_HOURS: i64 = 24 * 366;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} must be {1}")]
    Invalid(&'static str, &'static str),
}

/// Process-wide settings, read once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub server_port: u16,
    pub server_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl = match lookup("JWT_EXPIRES_HOURS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|hours| (1..=MAX_TOKEN_HOURS).contains(hours))
                .and_then(Duration::try_hours)
                .ok_or(ConfigError::Invalid(
                    "JWT_EXPIRES_HOURS",
                    "a number of hours between 1 and 8784",
                ))?,
            None => Duration::hours(DEFAULT_TOKEN_HOURS),
        };

        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("SERVER_PORT", "a number"))?,
            None => 8080,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            token_ttl,
            server_port,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
