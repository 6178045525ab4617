//! Configuration loaded from the environment.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Engine behaviour shared by every scan and restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Inputs longer than this many bytes are rejected before scanning.
    pub max_input_bytes: usize,
    /// Fail restores whose map holds entries the text never references.
    pub strict_restore: bool,
    /// Default for `ScanOptions::include_names` when a caller omits it.
    pub include_names: bool,
    /// Default for `ScanOptions::include_addresses` when a caller omits it.
    pub include_addresses: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 256 * 1024,
            strict_restore: false,
            include_names: true,
            include_addresses: true,
        }
    }
}

/// How long the server keeps redaction maps for later restoration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Maps are deleted this many hours after they were stored.
    pub retention_hours: u64,
    /// Upper bound on stored maps; the oldest is evicted first.
    pub max_stored_maps: usize,
    /// Interval of the background purge task.
    pub sweep_interval_secs: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_hours: 24,
            max_stored_maps: 10_000,
            sweep_interval_secs: 300,
        }
    }
}

/// Top-level Veil configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeilConfig {
    /// HTTP server port.
    pub port: u16,
    pub engine: EngineConfig,
    pub retention: RetentionConfig,
}

impl Default for VeilConfig {
    fn default() -> Self {
        Self {
            port: 3004,
            engine: EngineConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

impl VeilConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unset or unparsable
    /// values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            port: env_value(&lookup, "PORT").unwrap_or(defaults.port),
            engine: EngineConfig {
                max_input_bytes: env_value(&lookup, "VEIL_MAX_INPUT_BYTES")
                    .unwrap_or(defaults.engine.max_input_bytes),
                strict_restore: env_value(&lookup, "VEIL_STRICT_RESTORE")
                    .unwrap_or(defaults.engine.strict_restore),
                include_names: env_value(&lookup, "VEIL_INCLUDE_NAMES")
                    .unwrap_or(defaults.engine.include_names),
                include_addresses: env_value(&lookup, "VEIL_INCLUDE_ADDRESSES")
                    .unwrap_or(defaults.engine.include_addresses),
            },
            retention: RetentionConfig {
                retention_hours: env_value(&lookup, "VEIL_MAP_RETENTION_HOURS")
                    .unwrap_or(defaults.retention.retention_hours),
                max_stored_maps: env_value(&lookup, "VEIL_MAX_STORED_MAPS")
                    .unwrap_or(defaults.retention.max_stored_maps),
                sweep_interval_secs: env_value(&lookup, "VEIL_SWEEP_INTERVAL_SECS")
                    .unwrap_or(defaults.retention.sweep_interval_secs),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.engine.max_input_bytes == 0 {
            return Err(Error::Config("VEIL_MAX_INPUT_BYTES must be positive".into()));
        }
        if self.retention.retention_hours == 0 {
            return Err(Error::Config("VEIL_MAP_RETENTION_HOURS must be positive".into()));
        }
        if self.retention.max_stored_maps == 0 {
            return Err(Error::Config("VEIL_MAX_STORED_MAPS must be positive".into()));
        }
        if self.retention.sweep_interval_secs == 0 {
            return Err(Error::Config("VEIL_SWEEP_INTERVAL_SECS must be positive".into()));
        }
        Ok(())
    }
}

fn env_value<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        warn!("Ignoring unparsable {}={:?}, using default", key, raw);
    }
    parsed
}
