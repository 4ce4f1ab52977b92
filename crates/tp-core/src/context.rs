//! Initialized tracker client context
//!
//! Produced once from a [`ClientConfig`] before any pool is built. Holding a
//! `ClientContext` proves the client settings were validated; connectors take
//! it by value instead of reading process-wide state.

use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::ConfigError;

/// Validated, ready-to-use client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    tracker_address: String,
    connect_timeout: Duration,
    network_timeout: Duration,
}

impl ClientContext {
    /// Validate the client configuration and produce a context.
    ///
    /// Failure here is fatal for pool construction.
    pub fn init(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (host, port) = config.tracker_host_port()?;

        let context = Self {
            tracker_address: format!("{}:{}", host, port),
            connect_timeout: config.connect_timeout,
            network_timeout: config.network_timeout,
        };

        tracing::info!(
            tracker = %context.tracker_address,
            connect_timeout = ?context.connect_timeout,
            network_timeout = ?context.network_timeout,
            "Tracker client initialized"
        );

        Ok(context)
    }

    /// Tracker address as `host:port`
    pub fn tracker_address(&self) -> &str {
        &self.tracker_address
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn network_timeout(&self) -> Duration {
        self.network_timeout
    }
}
