//! Receiver configuration and statistics.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Interval slept between interface attempts, regardless of their outcome
pub const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_secs(1);

/// Deadline for a single datagram read; expiry moves the rotation on
pub const DEFAULT_READ_DEADLINE: Duration = Duration::from_millis(300);

/// Largest datagram the receiver accepts, also requested as the socket
/// receive buffer size
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 65536;

/// Receiver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// Sleep between interface attempts
    #[serde(with = "humantime_serde")]
    pub cycle_interval: Duration,

    /// How long a read may wait for traffic before the attempt ends
    #[serde(with = "humantime_serde")]
    pub read_deadline: Duration,

    /// Capacity of the reusable datagram buffer
    pub max_datagram_size: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            cycle_interval: DEFAULT_CYCLE_INTERVAL,
            read_deadline: DEFAULT_READ_DEADLINE,
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
        }
    }
}

impl ReceiverConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cycle_interval.is_zero() {
            return Err("Cycle interval must be non-zero".to_string());
        }

        if self.read_deadline.is_zero() {
            return Err("Read deadline must be non-zero".to_string());
        }

        if self.max_datagram_size == 0 {
            return Err("Maximum datagram size must be non-zero".to_string());
        }

        Ok(())
    }
}

/// Receiver statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReceiverStats {
    /// Interface attempts that reached the read loop
    pub attempts: u64,

    /// Attempts aborted before the read loop (resolution or join failure)
    pub failed_attempts: u64,

    /// Attempts ended by the read deadline with no traffic
    pub idle_timeouts: u64,

    /// Attempts ended by a read error
    pub read_errors: u64,

    /// Datagrams dispatched to the consumer
    pub datagrams_received: u64,

    /// Payload bytes dispatched to the consumer
    pub bytes_received: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReceiverConfig::default();
        assert_eq!(config.cycle_interval, Duration::from_secs(1));
        assert_eq!(config.read_deadline, Duration::from_millis(300));
        assert_eq!(config.max_datagram_size, 65536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ReceiverConfig::default();

        config.read_deadline = Duration::ZERO;
        assert!(config.validate().is_err());

        config.read_deadline = Duration::from_millis(10);
        config.cycle_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        config.cycle_interval = Duration::from_millis(10);
        config.max_datagram_size = 0;
        assert!(config.validate().is_err());

        config.max_datagram_size = 1500;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ReceiverConfig {
            cycle_interval: Duration::from_millis(250),
            read_deadline: Duration::from_millis(50),
            max_datagram_size: 2048,
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: ReceiverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_humantime_fields() {
        let json = r#"{
            "cycle_interval": "1s",
            "read_deadline": "300ms",
            "max_datagram_size": 65536
        }"#;

        let parsed: ReceiverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, ReceiverConfig::default());
    }
}
