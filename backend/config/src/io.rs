//! Config file location and loading.

use crate::schema::MagpieConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "MAGPIE_CONFIG_DIR";

/// Resolve the config directory.
/// Priority: `MAGPIE_CONFIG_DIR` env > `~/.magpie/` > `./.magpie/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".magpie"))
        .unwrap_or_else(|| PathBuf::from(".magpie"))
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Parse a config document. An empty document is the default config.
pub fn parse_config(raw: &str) -> Result<MagpieConfig> {
    if raw.trim().is_empty() {
        return Ok(MagpieConfig::default());
    }
    serde_yaml::from_str(raw).context("Failed to parse config YAML")
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<MagpieConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(MagpieConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&raw).with_context(|| format!("Invalid config at: {}", path.display()))
}
