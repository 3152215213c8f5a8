//! Config file loading.

use crate::schema::BunwatchConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the Bunwatch config directory.
/// Priority: `BUNWATCH_CONFIG_DIR` env > `~/.bunwatch/` > `./.bunwatch`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BUNWATCH_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".bunwatch"))
        .unwrap_or_else(|| PathBuf::from(".bunwatch"))
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist, so a
/// deployment driven purely by environment variables needs no file.
pub async fn load_config(path: &Path) -> Result<BunwatchConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(BunwatchConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse YAML text. An empty document yields the default config.
pub fn parse_config(raw: &str) -> Result<BunwatchConfig> {
    if raw.trim().is_empty() {
        return Ok(BunwatchConfig::default());
    }
    Ok(serde_yaml::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("nope.yaml")).await.unwrap();
        assert!(cfg.stream.is_none());
    }

    #[tokio::test]
    async fn reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        tokio::fs::write(&path, "snapshot:\n  url: http://cam/snap.jpg\n")
            .await
            .unwrap();
        let cfg = load_config(&path).await.unwrap();
        assert_eq!(cfg.snapshot.unwrap().url.unwrap(), "http://cam/snap.jpg");
    }

    #[test]
    fn empty_document_is_default() {
        let cfg = parse_config("  \n").unwrap();
        assert!(cfg.discord.is_none());
    }

    #[test]
    fn malformed_yaml_is_error() {
        assert!(parse_config("stream: [unclosed").is_err());
    }
}
