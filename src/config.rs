// Application configuration
// Built once at startup and shared by reference; nothing reads the
// environment after this point.

use std::time::Duration;

/// Configuration errors are fatal: the server refuses to start
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Process-wide settings injected into every component constructor
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub redis_url: String,
    pub host: String,
    pub port: u16,
    /// Origin allowed by the CORS layer (the frontend URL)
    pub allowed_origin: String,
    /// HMAC secret used to sign session tokens
    pub secret_key: String,
    pub store_timeout: Duration,
    pub cache_timeout: Duration,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            redis_url: or_default("REDIS_URL", "redis://127.0.0.1:6379"),
            host: or_default("HOST", "0.0.0.0"),
            port: parse_or(&lookup, "PORT", 9000)?,
            allowed_origin: or_default("FRONTEND_URL", "http://localhost:3000"),
            secret_key: required("SECRET_KEY")?,
            store_timeout: Duration::from_millis(parse_or(&lookup, "STORE_TIMEOUT_MS", 3000)?),
            cache_timeout: Duration::from_millis(parse_or(&lookup, "CACHE_TIMEOUT_MS", 500)?),
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
        })
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
