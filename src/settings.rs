use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::log_warn;
use crate::segmentation::ChainConfig;

const ENABLE_LOGS: bool = true;

/// Load a segmentation config from JSON.
///
/// A missing file yields the defaults; fields absent from the file keep their
/// default values. The loaded config is validated before it is returned.
pub fn load_config(path: &Path) -> Result<ChainConfig> {
    if !path.exists() {
        log_warn!("Config {} not found; using defaults", path.display());
        return Ok(ChainConfig::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: ChainConfig = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Rejected config {}", path.display()))?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &ChainConfig) -> Result<()> {
    let serialized = serde_json::to_string_pretty(config)?;
    fs::write(path, serialized)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}
