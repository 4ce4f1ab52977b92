//! Tracker client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::serde_utils::whole_secs;
use crate::error::ConfigError;

/// Settings used to reach the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Tracker address as `host:port`
    pub tracker_server: String,

    /// Timeout for establishing a TCP connection
    #[serde(with = "whole_secs")]
    pub connect_timeout: Duration,

    /// Timeout for a single request/response exchange
    #[serde(with = "whole_secs")]
    pub network_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tracker_server: "127.0.0.1:22122".to_string(),
            connect_timeout: Duration::from_secs(5),
            network_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Split `tracker_server` into host and port
    pub fn tracker_host_port(&self) -> Result<(&str, u16), ConfigError> {
        let (host, port) = self.tracker_server.rsplit_once(':').ok_or_else(|| {
            ConfigError::Invalid(format!(
                "tracker_server '{}' must be host:port",
                self.tracker_server
            ))
        })?;

        if host.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "tracker_server '{}' has an empty host",
                self.tracker_server
            )));
        }

        let port: u16 = port
            .parse()
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "tracker_server '{}' has an invalid port",
                    self.tracker_server
                ))
            })?;

        Ok((host, port))
    }

    /// Check the address and timeouts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracker_server.trim().is_empty() {
            return Err(ConfigError::MissingField("client.tracker_server".to_string()));
        }
        self.tracker_host_port()?;

        if self.connect_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "connect_timeout must be positive".to_string(),
            ));
        }
        if self.network_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "network_timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
