//! Config command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::output::{print_error, print_info, print_success, print_warning};
use tp_core::config::{self, Config};

fn resolve_path(config_path: Option<&PathBuf>) -> PathBuf {
    config_path
        .cloned()
        .unwrap_or_else(config::default_config_path)
}

/// Load the configuration the pool will run with.
///
/// An explicit `--config` path must exist. Without one, the default location
/// is used if present and built-in defaults otherwise.
pub fn load_effective_config(config_path: Option<&PathBuf>) -> Result<Config> {
    let config = match config_path {
        Some(path) => read_config(path)?,
        None => {
            let path = config::default_config_path();
            if path.exists() {
                read_config(&path)?
            } else {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Config::default()
            }
        }
    };

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<Config> {
    config::load_config(path).with_context(|| format!("Failed to load config from {:?}", path))
}

/// Show the effective configuration
pub fn config_show(config_path: Option<&PathBuf>) -> Result<()> {
    let path = resolve_path(config_path);

    if path.exists() {
        print_info(&format!("Configuration file: {:?}", path));
    } else {
        print_warning(&format!("No configuration file found at {:?}", path));
        print_info("Showing built-in defaults; run 'tracker-pool config init' to create one");
    }
    println!();

    let config = if path.exists() {
        read_config(&path)?
    } else {
        Config::default()
    };
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}

/// Print the configuration file location
pub fn config_path(config_path: Option<&PathBuf>) {
    println!("{}", resolve_path(config_path).display());
}

/// Check that the configuration file parses and passes validation
pub fn config_validate(config_path: Option<&PathBuf>) -> Result<()> {
    let path = resolve_path(config_path);
    let config = read_config(&path)?;

    config
        .validate()
        .with_context(|| format!("Invalid configuration in {:?}", path))?;

    print_success(&format!(
        "Configuration is valid (tracker {}, pool {}..{})",
        config.client.tracker_server,
        config.pool.min_pool_size(),
        config.pool.max_pool_size()
    ));
    Ok(())
}

/// Write a commented default configuration file
pub fn config_init(config_path: Option<&PathBuf>, force: bool) -> Result<()> {
    let config_file = resolve_path(config_path);

    if let Some(config_dir) = config_file.parent() {
        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            std::fs::create_dir_all(config_dir).with_context(|| {
                format!("Failed to create config directory: {:?}", config_dir)
            })?;
            print_success(&format!("Created config directory: {:?}", config_dir));
        }
    }

    if config_file.exists() && !force {
        print_error(&format!("Config file already exists: {:?}", config_file));
        print_info("Use --force to overwrite");
        return Ok(());
    }

    std::fs::write(&config_file, generate_default_config())
        .with_context(|| format!("Failed to write config file: {:?}", config_file))?;

    print_success(&format!("Created configuration file: {:?}", config_file));
    Ok(())
}

/// Default configuration with every key documented
fn generate_default_config() -> String {
    r#"# tracker-pool configuration

[client]
# Tracker address as host:port
tracker_server = "127.0.0.1:22122"

# Seconds allowed for establishing a TCP connection
connect_timeout = 5

# Seconds allowed for a single request/response exchange
network_timeout = 30

[pool]
# Connections opened when the pool starts
min_pool_size = 1

# Maximum number of idle connections kept
max_pool_size = 8

# Open attempts per connection before giving up
reconnect_attempts = 5

# Seconds a checkout waits for an idle connection
wait_timeout = 2

# Seconds between health checks of idle connections
probe_interval = 60
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tp_core::config::{ClientConfig, PoolConfig};

    #[test]
    fn test_default_config_matches_defaults() {
        let parsed: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(parsed.client, ClientConfig::default());
        assert_eq!(parsed.pool, PoolConfig::default());
    }

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        config_init(Some(&path), false).unwrap();
        let config = load_effective_config(Some(&path)).unwrap();

        assert_eq!(config.pool.max_pool_size(), 8);
    }

    #[test]
    fn test_init_does_not_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pool]\nmax_pool_size = 3\n").unwrap();

        config_init(Some(&path), false).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("max_pool_size = 3"));

        config_init(Some(&path), true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("max_pool_size = 8"));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load_effective_config(Some(&path)).is_err());
    }

    #[test]
    fn test_invalid_pool_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pool]\nmin_pool_size = 9\nmax_pool_size = 2\n").unwrap();

        assert!(load_effective_config(Some(&path)).is_err());
        assert!(config_validate(Some(&path)).is_err());
    }
}
