//! Engine configuration.
//!
//! All fields have defaults, so a JSON document only needs the values it
//! changes:
//!
//! ```
//! use ubxwire::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "max_wait_ms": 250 }"#).unwrap();
//! assert_eq!(config.max_wait_ms, 250);
//! assert_eq!(config.poll_interval_us, 500);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UbxError};
use crate::protocol::{ACK_PAYLOAD_SIZE, DEFAULT_MAX_PAYLOAD_SIZE};

/// Default command wait. 250 ms is enough for I2C but not for USB serial.
pub const DEFAULT_MAX_WAIT_MS: u64 = 1100;

/// Default pause between transport polls inside a command wait.
pub const DEFAULT_POLL_INTERVAL_US: u64 = 500;

/// Default minimum spacing of idle I2C polls.
pub const DEFAULT_POLLING_WAIT_MS: u64 = 100;

/// Default cap on bytes drained per poll.
pub const DEFAULT_MAX_BYTES_PER_POLL: usize = 4096;

/// Tunables for the protocol engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wait used when an operation is given no explicit timeout.
    pub max_wait_ms: u64,
    /// Pause between transport polls while waiting for an answer.
    pub poll_interval_us: u64,
    /// Minimum spacing of idle polls on I2C.
    pub polling_wait_ms: u64,
    /// Largest declared payload length the decoder will buffer. Must fit an
    /// ACK frame.
    pub max_payload_size: u16,
    /// Upper bound on bytes consumed by a single poll.
    pub max_bytes_per_poll: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_wait_ms: DEFAULT_MAX_WAIT_MS,
            poll_interval_us: DEFAULT_POLL_INTERVAL_US,
            polling_wait_ms: DEFAULT_POLLING_WAIT_MS,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            max_bytes_per_poll: DEFAULT_MAX_BYTES_PER_POLL,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_wait_ms == 0 {
            return Err(UbxError::Config("max_wait_ms must be non-zero".to_string()));
        }
        if self.max_payload_size < ACK_PAYLOAD_SIZE {
            return Err(UbxError::Config(format!(
                "max_payload_size must be at least {}",
                ACK_PAYLOAD_SIZE
            )));
        }
        if self.max_bytes_per_poll == 0 {
            return Err(UbxError::Config(
                "max_bytes_per_poll must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// `max_wait_ms` as a `Duration`.
    #[inline]
    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    /// `poll_interval_us` as a `Duration`.
    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_micros(self.poll_interval_us)
    }

    /// `polling_wait_ms` as a `Duration`.
    #[inline]
    pub fn polling_wait(&self) -> Duration {
        Duration::from_millis(self.polling_wait_ms)
    }
}
