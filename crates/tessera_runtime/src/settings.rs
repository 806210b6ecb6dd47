//! Runtime settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tessera_core::config::RegistryConfig;
use tessera_core::time::DEFAULT_TICK_RATE_HZ;

/// Settings for one simulation run. Every field is optional in the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub tick_rate_hz: u32,
    /// Frames to simulate before exiting.
    pub frames: u64,
    /// Number of orbiting entities in the demo scene.
    pub satellites: u32,
    /// Log a summary every this many frames; 0 disables it.
    pub report_every: u64,
    pub registry: RegistryConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            frames: 600,
            satellites: 256,
            report_every: 120,
            registry: RegistryConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}
