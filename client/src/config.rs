//! Configuration management for the SpiceTrack client core
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SPICETRACK_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Local durable store configuration
    pub storage: StorageConfig,

    /// Remote data gateway configuration
    pub remote: RemoteConfig,

    /// Authentication configuration
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the JSON key-value store
    pub data_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    /// Postgres connection URL of the hosted backend; unset means local-only
    pub database_url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment =
            std::env::var("SPICETRACK_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("storage.data_dir", ".spicetrack")?
            .set_default("remote.max_connections", 5)?
            .set_default("auth.bcrypt_cost", bcrypt::DEFAULT_COST)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SPICETRACK_ prefix)
            .add_source(
                Environment::with_prefix("SPICETRACK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            storage: StorageConfig {
                data_dir: ".spicetrack".to_string(),
            },
            remote: RemoteConfig {
                database_url: None,
                max_connections: 5,
            },
            auth: AuthConfig {
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
        }
    }
}
