use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::handicap::DEFAULT_AVG_PUTTS_PER_MINUTE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub require_ssl: bool,
    /// Reference pace used to estimate a shootout's duration
    pub shootout_avg_putts_per_minute: f64,
    pub handicap_cooldown_hours: f64,
}

impl Config {
    /// Load configuration from the environment (after `.env` has been applied by the caller)
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")
            .or_else(|_| required("SECRET_KEY"))
            .map_err(|_| ConfigError::Missing("JWT_SECRET or SECRET_KEY"))?
            .trim_matches('"')
            .to_string();

        let config = Self {
            database_url,
            jwt_secret,
            port: try_load("PORT", 3000)?,
            db_max_connections: try_load("DB_MAX_CONNECTIONS", 5)?,
            require_ssl: try_load("DATABASE_REQUIRE_SSL", false)?,
            shootout_avg_putts_per_minute: positive(
                "SHOOTOUT_AVG_PUTTS_PER_MINUTE",
                try_load("SHOOTOUT_AVG_PUTTS_PER_MINUTE", DEFAULT_AVG_PUTTS_PER_MINUTE)?,
            )?,
            handicap_cooldown_hours: non_negative(
                "HANDICAP_COOLDOWN_HOURS",
                try_load("HANDICAP_COOLDOWN_HOURS", 24.0)?,
            )?,
        };

        Ok(config)
    }

    /// Configuration for tests and local tooling
    pub fn for_database(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            port: 3000,
            db_max_connections: 5,
            require_ssl: false,
            shootout_avg_putts_per_minute: DEFAULT_AVG_PUTTS_PER_MINUTE,
            handicap_cooldown_hours: 24.0,
        }
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                message: e.to_string(),
            }
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

/// Finite and greater than zero
fn positive(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Invalid {
            key,
            message: format!("must be a positive number, got {value}"),
        });
    }
    Ok(value)
}

/// Finite and zero or greater; a zero cooldown disables it
fn non_negative(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Invalid {
            key,
            message: format!("must be a non-negative number, got {value}"),
        });
    }
    Ok(value)
}
