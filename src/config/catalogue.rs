//! Course catalogue configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use super::Environment;

/// Where course descriptors come from.
///
/// With neither `base_url` nor `seed_path` set, the server starts with an
/// empty in-memory catalogue and every checkout resolves to not-found.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueConfig {
    /// Base URL of the catalogue service
    pub base_url: Option<String>,

    /// YAML file with course descriptors
    pub seed_path: Option<PathBuf>,

    /// Lookup timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Resolved catalogue source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueSource<'a> {
    Http { base_url: &'a str, timeout: Duration },
    Seed(&'a PathBuf),
    Empty,
}

impl CatalogueConfig {
    pub fn source(&self) -> CatalogueSource<'_> {
        match (&self.base_url, &self.seed_path) {
            (Some(base_url), _) => CatalogueSource::Http {
                base_url,
                timeout: Duration::from_secs(self.request_timeout_secs),
            },
            (None, Some(path)) => CatalogueSource::Seed(path),
            (None, None) => CatalogueSource::Empty,
        }
    }

    /// Validate catalogue configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.base_url.is_some() && self.seed_path.is_some() {
            return Err(ValidationError::ConflictingCatalogueSources);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidCatalogueUrl);
            }
            if *environment == Environment::Production && !url.starts_with("https://") {
                return Err(ValidationError::CatalogueUrlMustBeHttps);
            }
        }
        Ok(())
    }
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            seed_path: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    5
}
