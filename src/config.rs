//! Session configuration.
//!
//! Every field has a default, so an empty YAML document is a valid config.
//!
//! ```rust
//! use racewire::SessionConfig;
//!
//! let config = SessionConfig::from_yaml_str("bind_port: 20778\nhistory_capacity: 500\n").unwrap();
//! assert_eq!(config.bind_port, 20778);
//! assert_eq!(config.bind_address, "127.0.0.1");
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::wire::{DEFAULT_PORT, HEADER_SIZE, MAX_DATAGRAM_SIZE};
use crate::{Result, TelemetryError};

/// Environment variable overriding [`SessionConfig::bind_address`].
pub const ENV_BIND_ADDRESS: &str = "RACEWIRE_BIND_ADDRESS";

/// Environment variable overriding [`SessionConfig::bind_port`].
pub const ENV_UDP_PORT: &str = "RACEWIRE_UDP_PORT";

/// Configuration for a [`TelemetrySession`](crate::TelemetrySession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct SessionConfig {
    pub bind_address: String,
    pub bind_port: u16,
    /// Records kept per kind before the oldest is evicted.
    pub history_capacity: usize,
    /// How long one receive waits before reporting no packet.
    pub receive_timeout_ms: u64,
    pub max_datagram_size: usize,
    /// Buffered events per subscriber before the oldest are dropped.
    pub event_channel_capacity: usize,
    /// Rate the game sends at, used to normalise [`UpdateRate`](crate::UpdateRate).
    pub source_hz: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            bind_port: DEFAULT_PORT,
            history_capacity: 1000,
            receive_timeout_ms: 1000,
            max_datagram_size: MAX_DATAGRAM_SIZE,
            event_channel_capacity: 256,
            source_hz: 60.0,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: SessionConfig = if yaml.trim().is_empty() {
            SessionConfig::default()
        } else {
            serde_yaml_ng::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| TelemetryError::config_file_error(path.to_path_buf(), e))?;
        debug!(path = %path.display(), bytes = yaml.len(), "Loaded session config");
        Self::from_yaml_str(&yaml)
    }

    /// Apply `RACEWIRE_BIND_ADDRESS` and `RACEWIRE_UDP_PORT` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable or zero
    /// ports are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(address) = lookup(ENV_BIND_ADDRESS).filter(|a| !a.trim().is_empty()) {
            self.bind_address = address.trim().to_string();
        }
        if let Some(port) = lookup(ENV_UDP_PORT)
            .and_then(|v| v.trim().parse::<u16>().ok())
            .filter(|&p| p > 0)
        {
            self.bind_port = port;
        }
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_port = port;
        self
    }

    pub fn with_bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = address.into();
        self
    }

    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }

    /// Check values are usable. Port 0 is allowed and binds an ephemeral port.
    pub fn validate(&self) -> Result<()> {
        if self.bind_address.trim().is_empty() {
            return Err(TelemetryError::config_invalid("bind_address must not be empty"));
        }
        if self.history_capacity == 0 {
            return Err(TelemetryError::config_invalid("history_capacity must be positive"));
        }
        if self.receive_timeout_ms == 0 {
            return Err(TelemetryError::config_invalid("receive_timeout_ms must be positive"));
        }
        if self.max_datagram_size < HEADER_SIZE {
            return Err(TelemetryError::config_invalid(format!(
                "max_datagram_size must be at least {} bytes",
                HEADER_SIZE
            )));
        }
        if self.event_channel_capacity == 0 {
            return Err(TelemetryError::config_invalid("event_channel_capacity must be positive"));
        }
        if !(self.source_hz.is_finite() && self.source_hz > 0.0) {
            return Err(TelemetryError::config_invalid("source_hz must be a positive number"));
        }
        Ok(())
    }
}
