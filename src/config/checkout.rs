//! Checkout lifetime configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// How long an untouched checkout is kept before it is evicted.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutConfig {
    /// Seconds since the last transition after which a checkout is evicted
    #[serde(default = "default_idle_ttl")]
    pub idle_ttl_secs: u64,

    /// Seconds between eviction sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl CheckoutConfig {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate checkout lifetime configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.idle_ttl_secs == 0 {
            return Err(ValidationError::InvalidIdleTtl);
        }
        if self.sweep_interval_secs == 0 || self.sweep_interval_secs > self.idle_ttl_secs {
            return Err(ValidationError::InvalidSweepInterval);
        }
        Ok(())
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: default_idle_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_idle_ttl() -> u64 {
    1800
}

fn default_sweep_interval() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_evict_after_half_an_hour() {
        let config = CheckoutConfig::default();
        assert_eq!(config.idle_ttl(), Duration::from_secs(1800));
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_ttl() {
        let config = CheckoutConfig {
            idle_ttl_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidIdleTtl));
    }

    #[test]
    fn rejects_sweep_slower_than_ttl() {
        let config = CheckoutConfig {
            idle_ttl_secs: 30,
            sweep_interval_secs: 60,
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSweepInterval));
    }
}
