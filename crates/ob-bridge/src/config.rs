//! Bridge configuration, loadable from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Default config location when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/ob-bridge/bridge.toml";

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Top-level configuration for the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// SocketCAN interface name (e.g., "can0"). None runs against the
    /// simulated ECU.
    #[serde(default)]
    pub can_interface: Option<String>,
    /// How long to wait for an ECU reply, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Bus poll / timeout check cadence, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Log line format on stderr.
    #[serde(default)]
    pub log_format: LogFormat,
    /// LED brightness file toggled by `LED_ON` / `LED_OFF`.
    #[serde(default)]
    pub led_path: Option<PathBuf>,
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_poll_interval_ms() -> u64 {
    10
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            can_interface: None,
            timeout_ms: default_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            log_format: LogFormat::default(),
            led_path: None,
        }
    }
}

impl BridgeConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than zero");
        }
        if self.poll_interval_ms >= self.timeout_ms {
            anyhow::bail!(
                "poll_interval_ms ({}) must be shorter than timeout_ms ({})",
                self.poll_interval_ms,
                self.timeout_ms
            );
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
