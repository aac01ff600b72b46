//! Application configuration loading from config.toml
//!
//! Every section has defaults, so a missing file yields a runnable configuration.
//! `DATABASE_URL` and `BIND_ADDRESS` from the environment (or `.env`) take
//! precedence over the file, and `SANTA_CONFIG` points at an alternative file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Name drawing settings
    pub draw: DrawConfig,
    /// Defaults applied to new events
    pub events: EventDefaults,
}

/// HTTP listener settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the API binds to, e.g. `0.0.0.0:8080`
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Database connection settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SeaORM connection URL
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/secret_santa.sqlite?mode=rwc".to_string(),
        }
    }
}

/// Name drawing settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DrawConfig {
    /// Upper bound on shuffles tried before giving up on a derangement
    pub max_attempts: usize,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            max_attempts: crate::core::derangement::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Defaults applied to new events
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EventDefaults {
    /// Currency used when the organizer does not pick one
    pub default_currency: String,
}

impl Default for EventDefaults {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
        }
    }
}

impl AppConfig {
    /// Checks values serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.draw.max_attempts == 0 {
            return Err(Error::Config {
                message: "draw.max_attempts must be at least 1".to_string(),
            });
        }
        crate::core::event::normalize_currency(&self.events.default_currency).map_err(|e| {
            Error::Config {
                message: format!("events.default_currency: {e}"),
            }
        })?;
        Ok(())
    }

    /// Applies `DATABASE_URL` and `BIND_ADDRESS` overrides from the environment.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            debug!("Using DATABASE_URL from environment");
            self.database.url = url;
        }
        if let Ok(addr) = std::env::var("BIND_ADDRESS") {
            debug!("Using BIND_ADDRESS from environment");
            self.server.bind_address = addr;
        }
        self
    }
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the configuration the binary runs with.
///
/// Reads `SANTA_CONFIG` (or ./config.toml), falls back to defaults when the file
/// does not exist, then applies environment overrides and validates the result.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("SANTA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = if Path::new(&path).exists() {
        info!("Loading configuration from {}", path);
        load_config(&path)?
    } else {
        warn!("No configuration file at {}, using defaults", path);
        AppConfig::default()
    };

    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            bind_address = "0.0.0.0:9000"

            [database]
            url = "sqlite::memory:"

            [draw]
            max_attempts = 50

            [events]
            default_currency = "EUR"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.draw.max_attempts, 50);
        assert_eq!(config.events.default_currency, "EUR");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AppConfig = toml::from_str("[draw]\nmax_attempts = 10\n").unwrap();
        assert_eq!(config.draw.max_attempts, 10);
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.events.default_currency, "USD");
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = AppConfig::default();
        config.draw.max_attempts = 0;
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_currency() {
        let mut config = AppConfig::default();
        config.events.default_currency = "dollars".to_string();
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
