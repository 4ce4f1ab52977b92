//! Serde adapters for the config file
//!
//! Every timeout in `[client]` and `[pool]` (`connect_timeout`,
//! `network_timeout`, `wait_timeout` and `probe_interval`) is written as a
//! bare integer count of seconds.

/// `Duration` <-> integer seconds, for `#[serde(with = "whole_secs")]`.
///
/// Anything below a second is lost when saving: `Duration::from_millis(2500)`
/// is written back as `2`.
pub mod whole_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct PoolTimeouts {
        #[serde(with = "whole_secs")]
        wait_timeout: Duration,
        #[serde(with = "whole_secs")]
        probe_interval: Duration,
    }

    #[test]
    fn test_timeouts_written_as_integers() {
        let timeouts = PoolTimeouts {
            wait_timeout: Duration::from_secs(2),
            probe_interval: Duration::from_secs(3600),
        };
        let toml = toml::to_string(&timeouts).unwrap();
        assert!(toml.contains("wait_timeout = 2"));
        assert!(toml.contains("probe_interval = 3600"));
    }

    #[test]
    fn test_fractional_wait_saved_as_whole_seconds() {
        let timeouts = PoolTimeouts {
            wait_timeout: Duration::from_millis(2500),
            probe_interval: Duration::from_secs(60),
        };
        let json = serde_json::to_value(&timeouts).unwrap();
        assert_eq!(json["wait_timeout"], 2);
    }

    #[test]
    fn test_negative_timeout_rejected() {
        let result: Result<PoolTimeouts, _> =
            toml::from_str("wait_timeout = -1\nprobe_interval = 60\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_timeouts_read_from_pool_table() {
        let timeouts: PoolTimeouts =
            toml::from_str("wait_timeout = 5\nprobe_interval = 120\n").unwrap();
        assert_eq!(timeouts.wait_timeout, Duration::from_secs(5));
        assert_eq!(timeouts.probe_interval, Duration::from_secs(120));
    }
}
