//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `COURSE_CHECKOUT` prefix and nested values use double underscores as separators.
//!
//! Every section has defaults, so an empty environment yields a runnable
//! development server with an empty catalogue.
//!
//! # Example
//!
//! ```no_run
//! use course_checkout::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod catalogue;
mod checkout;
mod error;
mod navigation;
mod server;

pub use catalogue::{CatalogueConfig, CatalogueSource};
pub use checkout::CheckoutConfig;
pub use error::{ConfigError, ValidationError};
pub use navigation::NavigationConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;
use std::path::Path;

const ENV_PREFIX: &str = "COURSE_CHECKOUT";

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Course catalogue source (HTTP service or YAML seed)
    #[serde(default)]
    pub catalogue: CatalogueConfig,

    /// Exit paths and default locale
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Idle eviction of abandoned checkouts
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `COURSE_CHECKOUT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `COURSE_CHECKOUT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `COURSE_CHECKOUT__CATALOGUE__BASE_URL=...` -> `catalogue.base_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();
        Self::build(None)
    }

    /// Load configuration from a file, with environment variables layered on top.
    ///
    /// The format is inferred from the extension (`.yaml`, `.toml`, `.json`).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::build(Some(path.as_ref()))
    }

    fn build(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.catalogue.validate(&self.server.environment)?;
        self.navigation.validate()?;
        self.checkout.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
