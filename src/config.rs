//! Configuration management for the homestay booking core

use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;

use crate::error::AppResult;

/// Paths of the line-oriented data files, one per entity type
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub homestays_file: String,
    pub tours_file: String,
    pub bookings_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix HOMESTAY_)
            .add_source(
                Environment::with_prefix("HOMESTAY")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            homestays_file: "data/Homestays.txt".to_string(),
            tours_file: "data/Tours.txt".to_string(),
            bookings_file: "data/Bookings.txt".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
