//! Application settings.
//!
//! Settings come from a TOML file (`CONFIG_PATH`, or `./config.toml` when present)
//! with defaults for every value, then `DATABASE_URL` and `BIND_ADDR` from the
//! environment override the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default location of the configuration file.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Database pool settings
    pub database: DatabaseConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Database pool settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SeaORM connection URL
    pub url: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
    /// Seconds to wait for a free connection before failing the request
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://bills.sqlite?mode=rwc".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 5,
        }
    }
}

/// Parses configuration from TOML text. Missing sections and keys take their defaults.
///
/// # Errors
/// Returns `Error::Config` if the TOML is invalid or a value has the wrong type.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse configuration: {e}"),
    })
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns `Error::Config` if the file cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Loading configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Applies environment overrides using `lookup` to read variables.
fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL") {
        config.database.url = url;
    }
    if let Some(bind_addr) = lookup("BIND_ADDR") {
        config.server.bind_addr = bind_addr;
    }
}

/// Loads the application configuration used by the binary.
///
/// An explicit `CONFIG_PATH` must point at a readable file; the default `config.toml`
/// is optional.
///
/// # Errors
/// Returns `Error::Config` if the selected file cannot be read or parsed.
pub fn load_app_configuration() -> Result<AppConfig> {
    let mut config = match std::env::var("CONFIG_PATH") {
        Ok(path) => load_config(path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH)?,
        Err(_) => {
            info!("No {DEFAULT_CONFIG_PATH} found, using default configuration");
            AppConfig::default()
        }
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}
