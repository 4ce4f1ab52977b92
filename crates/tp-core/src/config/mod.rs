//! Configuration management for tracker-pool

mod client;
mod pool;
pub mod serde_utils;

pub use client::ClientConfig;
pub use pool::{PoolConfig, PoolConfigBuilder};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Top-level configuration file layout
///
/// ```toml
/// [client]
/// tracker_server = "10.0.0.5:22122"
///
/// [pool]
/// max_pool_size = 8
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracker client settings
    pub client: ClientConfig,
    /// Pool sizing and timing
    pub pool: PoolConfig,
}

impl Config {
    /// Validate both sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.client.validate()?;
        self.pool.validate()
    }
}

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tracker-pool")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config: {}", e)))?;

    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to a file
pub fn save_config<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::Invalid(format!("Failed to create config dir: {}", e)))?;
    }

    std::fs::write(path, content)
        .map_err(|e| ConfigError::Invalid(format!("Failed to write config: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<Config, _> = load_config(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.client.tracker_server = "10.1.2.3:22122".to_string();
        config.pool = PoolConfig::builder()
            .max_pool_size(4)
            .wait_timeout(Duration::from_secs(3))
            .build()
            .unwrap();

        save_config(&path, &config).unwrap();
        let loaded: Config = load_config(&path).unwrap();

        assert_eq!(loaded.client.tracker_server, "10.1.2.3:22122");
        assert_eq!(loaded.pool.max_pool_size(), 4);
        assert_eq!(loaded.pool.wait_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [pool]
            min_pool_size = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.pool.min_pool_size(), 2);
        assert_eq!(config.pool.max_pool_size(), 8);
        assert_eq!(config.client.tracker_server, "127.0.0.1:22122");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_probe_interval() {
        let config: Config = toml::from_str(
            r#"
            [pool]
            probe_interval = 0
            "#,
        )
        .unwrap();

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
