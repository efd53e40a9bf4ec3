//! # Topology Configuration
//!
//! Configuration surface consumed by the reliability core: the acking
//! enable/disable flag, the message timeout, the pending-window bound, and
//! worker housekeeping knobs. Values load from an explicit file (YAML or
//! TOML) with `TOPOLOGY_`-prefixed environment overrides, and are validated
//! up front instead of silently falling back at use sites.
//!
//! ## Usage
//!
//! ```rust
//! use topology_core::config::TopologyConfig;
//!
//! let config = TopologyConfig::default();
//! assert!(config.reliability.acking_enabled);
//! assert_eq!(config.reliability.message_timeout().as_secs(), 30);
//! ```

use crate::constants::defaults;
use crate::error::{Result, TopologyError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Root configuration for a topology process
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Acking protocol settings
    #[serde(default)]
    pub reliability: ReliabilityConfig,

    /// Worker loop housekeeping
    #[serde(default)]
    pub workers: WorkerConfig,
}

/// Settings governing the at-least-once acking protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    /// When false the coordinator is bypassed entirely and every tagged
    /// emit is treated as immediately successful.
    #[serde(default = "default_acking_enabled")]
    pub acking_enabled: bool,

    /// Roots with no terminal signal after this long are failed and replayed
    #[serde(default = "default_message_timeout_seconds")]
    pub message_timeout_seconds: u64,

    /// Admission-control bound on simultaneously open roots; enforced by
    /// the spout executor before emitting, not by the coordinator.
    #[serde(default = "default_max_spout_pending")]
    pub max_spout_pending: usize,
}

/// Worker loop housekeeping knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Interval between timeout-sweeper wakeups
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

fn default_acking_enabled() -> bool {
    true
}

fn default_message_timeout_seconds() -> u64 {
    defaults::MESSAGE_TIMEOUT_SECONDS
}

fn default_max_spout_pending() -> usize {
    defaults::MAX_SPOUT_PENDING
}

fn default_sweep_interval_ms() -> u64 {
    defaults::SWEEP_INTERVAL_MS
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            acking_enabled: default_acking_enabled(),
            message_timeout_seconds: default_message_timeout_seconds(),
            max_spout_pending: default_max_spout_pending(),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}

impl ReliabilityConfig {
    /// Message timeout as a [`Duration`]
    pub fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.message_timeout_seconds)
    }
}

impl WorkerConfig {
    /// Sweep interval as a [`Duration`]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl TopologyConfig {
    /// Load configuration from a file, applying `TOPOLOGY_`-prefixed
    /// environment overrides (e.g. `TOPOLOGY_RELIABILITY__ACKING_ENABLED`)
    /// on top of the file values, then validate.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("TOPOLOGY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: TopologyConfig = settings.try_deserialize()?;
        loaded.validate()?;

        tracing::info!(
            config_file = %path.display(),
            acking_enabled = loaded.reliability.acking_enabled,
            message_timeout_seconds = loaded.reliability.message_timeout_seconds,
            max_spout_pending = loaded.reliability.max_spout_pending,
            "Loaded topology configuration"
        );
        Ok(loaded)
    }

    /// Reject configurations the reliability core cannot operate under
    pub fn validate(&self) -> Result<()> {
        if self.reliability.message_timeout_seconds == 0 {
            return Err(TopologyError::configuration(
                "reliability.message_timeout_seconds must be greater than zero",
            ));
        }
        if self.reliability.max_spout_pending == 0 {
            return Err(TopologyError::configuration(
                "reliability.max_spout_pending must be greater than zero",
            ));
        }
        if self.workers.sweep_interval_ms == 0 {
            return Err(TopologyError::configuration(
                "workers.sweep_interval_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TopologyConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.reliability.acking_enabled);
        assert_eq!(
            config.reliability.message_timeout(),
            Duration::from_secs(defaults::MESSAGE_TIMEOUT_SECONDS)
        );
        assert_eq!(
            config.reliability.max_spout_pending,
            defaults::MAX_SPOUT_PENDING
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = TopologyConfig::default();
        config.reliability.message_timeout_seconds = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, TopologyError::Configuration { .. }));
    }

    #[test]
    fn test_zero_pending_window_rejected() {
        let mut config = TopologyConfig::default();
        config.reliability.max_spout_pending = 0;
        assert!(config.validate().is_err());
    }
}
