//! Executor settings
//!
//! Every field is optional in the settings file; missing values fall back to
//! the protocol defaults in [`power_remote_shared::timing`].
//!
//! ```toml
//! [wake]
//! repeat_count = 3
//! interval_ms = 500
//!
//! [shutdown]
//! port = 8080
//! connect_timeout_ms = 10000
//! read_timeout_ms = 10000
//! ```

use power_remote_shared::timing;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Magic packet cadence
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WakeSettings {
    /// Packets sent per wake request
    pub repeat_count: u32,
    /// Delay between consecutive packets
    pub interval_ms: u64,
}

impl Default for WakeSettings {
    fn default() -> Self {
        Self {
            repeat_count: timing::WAKE_REPEAT_COUNT,
            interval_ms: timing::WAKE_INTERVAL_MS,
        }
    }
}

impl WakeSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Shutdown request endpoint and timeouts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShutdownSettings {
    /// Port of the shutdown agent on the target host
    pub port: u16,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Default for ShutdownSettings {
    fn default() -> Self {
        Self {
            port: timing::SHUTDOWN_PORT,
            connect_timeout_ms: timing::SHUTDOWN_CONNECT_TIMEOUT_MS,
            read_timeout_ms: timing::SHUTDOWN_READ_TIMEOUT_MS,
        }
    }
}

impl ShutdownSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub wake: WakeSettings,
    pub shutdown: ShutdownSettings,
}

impl Settings {
    /// Load settings from a TOML file
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_toml(&raw)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.wake.repeat_count == 0 {
            return Err(ConfigError::Invalid(
                "wake.repeat_count must be at least 1".into(),
            ));
        }
        if self.shutdown.port == 0 {
            return Err(ConfigError::Invalid("shutdown.port must not be 0".into()));
        }
        if self.shutdown.connect_timeout_ms == 0 || self.shutdown.read_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "shutdown timeouts must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
