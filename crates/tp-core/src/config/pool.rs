//! Pool configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::serde_utils::whole_secs;
use crate::error::ConfigError;

/// Sizing and timing of a connection pool.
///
/// Immutable once built: construct it through [`PoolConfig::builder`] or
/// deserialize it and call [`PoolConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Connections opened when the pool is built
    min_pool_size: usize,

    /// Capacity of the idle buffer
    max_pool_size: usize,

    /// Attempts the session factory makes before giving up
    reconnect_attempts: u32,

    /// How long a checkout (and each health-sweep pop) waits for an idle connection
    #[serde(with = "whole_secs")]
    wait_timeout: Duration,

    /// Time between health sweeps
    #[serde(with = "whole_secs")]
    probe_interval: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_pool_size: 1,
            max_pool_size: 8,
            reconnect_attempts: 5,
            wait_timeout: Duration::from_secs(2),
            probe_interval: Duration::from_secs(60),
        }
    }
}

impl PoolConfig {
    /// Start building a configuration from the defaults
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::default()
    }

    pub fn min_pool_size(&self) -> usize {
        self.min_pool_size
    }

    pub fn max_pool_size(&self) -> usize {
        self.max_pool_size
    }

    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts
    }

    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    pub fn probe_interval(&self) -> Duration {
        self.probe_interval
    }

    /// Check the invariants the pool relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pool_size == 0 {
            return Err(ConfigError::Invalid(
                "max_pool_size must be at least 1".to_string(),
            ));
        }
        if self.min_pool_size > self.max_pool_size {
            return Err(ConfigError::Invalid(format!(
                "min_pool_size ({}) exceeds max_pool_size ({})",
                self.min_pool_size, self.max_pool_size
            )));
        }
        if self.reconnect_attempts == 0 {
            return Err(ConfigError::Invalid(
                "reconnect_attempts must be at least 1".to_string(),
            ));
        }
        if self.wait_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "wait_timeout must be positive".to_string(),
            ));
        }
        if self.probe_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "probe_interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Chained setters producing a validated [`PoolConfig`]
#[derive(Debug, Clone, Default)]
pub struct PoolConfigBuilder {
    config: PoolConfig,
}

impl PoolConfigBuilder {
    pub fn min_pool_size(mut self, size: usize) -> Self {
        self.config.min_pool_size = size;
        self
    }

    pub fn max_pool_size(mut self, size: usize) -> Self {
        self.config.max_pool_size = size;
        self
    }

    pub fn reconnect_attempts(mut self, attempts: u32) -> Self {
        self.config.reconnect_attempts = attempts;
        self
    }

    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.config.wait_timeout = timeout;
        self
    }

    pub fn probe_interval(mut self, interval: Duration) -> Self {
        self.config.probe_interval = interval;
        self
    }

    /// Validate and freeze the configuration
    pub fn build(self) -> Result<PoolConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
