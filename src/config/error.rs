//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Catalogue URL must start with http:// or https://")]
    InvalidCatalogueUrl,

    #[error("Catalogue URL must use HTTPS in production")]
    CatalogueUrlMustBeHttps,

    #[error("Configure either a catalogue URL or a seed file, not both")]
    ConflictingCatalogueSources,

    #[error("Navigation path '{0}' must start with '/'")]
    InvalidNavigationPath(String),

    #[error("Unsupported default locale: {0}")]
    UnsupportedLocale(String),

    #[error("Checkout idle TTL must be greater than zero")]
    InvalidIdleTtl,

    #[error("Checkout sweep interval must be between one second and the idle TTL")]
    InvalidSweepInterval,
}
