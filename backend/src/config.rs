//! Configuration management for the Poultry House Records server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides (PHR__SECTION__KEY)

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Sheet storage configuration
    pub storage: StorageConfig,

    /// Flock defaults
    pub flock: FlockConfig,

    /// Viewing windows for recent data
    pub reporting: ReportingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding one CSV file per sheet
    pub data_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlockConfig {
    /// Head count assumed for a house with no records
    pub default_initial_stock: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportingConfig {
    /// Default window for recent daily data, in days
    pub recent_days: u32,

    /// Default window for recent purchases, in days
    pub purchase_window_days: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("PHR_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("storage.data_dir", "data")?
            .set_default("flock.default_initial_stock", shared::DEFAULT_INITIAL_STOCK)?
            .set_default("reporting.recent_days", 14)?
            .set_default("reporting.purchase_window_days", 14)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PHR__ prefix)
            .add_source(
                Environment::with_prefix("PHR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configuration rooted at `data_dir`, with every other value defaulted
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            storage: StorageConfig {
                data_dir: data_dir.into(),
            },
            flock: FlockConfig::default(),
            reporting: ReportingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            default_initial_stock: shared::DEFAULT_INITIAL_STOCK,
        }
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            recent_days: 14,
            purchase_window_days: 14,
        }
    }
}
