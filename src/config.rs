//! Persisted session configuration
//!
//! Stored as a small JSON record so files written by earlier tooling
//! (`{"serial_number": ..., "trigger_threshold": ...}`) load unchanged.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::edge::TriggerMode;

/// Config file name
pub const CONFIG_FILE: &str = "spike_config.json";

/// Highest threshold the prompt accepts (sensor range is 0-10 N)
pub const MAX_THRESHOLD: u8 = 10;

/// Saved device and trigger settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpikeConfig {
    /// USB serial number of the hub last used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Force threshold in newtons; 1 selects instant-touch mode
    #[serde(default = "default_threshold")]
    pub trigger_threshold: u8,
}

fn default_threshold() -> u8 {
    1
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            serial_number: None,
            trigger_threshold: default_threshold(),
        }
    }
}

impl SpikeConfig {
    /// Create a config for a device and threshold
    pub fn new(serial_number: Option<String>, trigger_threshold: u8) -> Self {
        Self {
            serial_number,
            trigger_threshold,
        }
    }

    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("spike-clicker"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_FILE)
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Load config, treating an unreadable file as no saved config
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("Ignoring saved config: {:#}", e);
            Self::default()
        })
    }

    /// Save config to a file, replacing whatever was there
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Saved serial number, ignoring an empty string
    pub fn saved_serial(&self) -> Option<&str> {
        self.serial_number.as_deref().filter(|s| !s.is_empty())
    }

    /// Trigger mode selected by the threshold
    pub fn trigger_mode(&self) -> TriggerMode {
        TriggerMode::from_threshold(self.trigger_threshold)
    }
}
