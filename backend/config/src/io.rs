//! Config file location and loading.

use crate::schema::FileEditConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the FileEdit config directory.
/// Priority: `FILEEDIT_CONFIG_DIR` env > `~/.fileedit/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FILEEDIT_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".fileedit"),
        None => PathBuf::from(".fileedit"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<FileEditConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(FileEditConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse YAML text; an empty document yields the default config.
pub fn parse_config(raw: &str) -> Result<FileEditConfig> {
    if raw.trim().is_empty() {
        return Ok(FileEditConfig::default());
    }
    Ok(serde_yaml::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!("fileedit-missing-{}.yaml", std::process::id()));
        let cfg = load_config(&path).await.unwrap();
        assert_eq!(cfg, FileEditConfig::default());
    }

    #[tokio::test]
    async fn loads_yaml_from_disk() {
        let path = std::env::temp_dir().join(format!("fileedit-load-{}.yaml", std::process::id()));
        fs::write(&path, "history:\n  maxEntries: 7\n").await.unwrap();
        let cfg = load_config(&path).await.unwrap();
        fs::remove_file(&path).await.unwrap();
        assert_eq!(cfg.history_max_entries(), 7);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(parse_config("  \n").unwrap(), FileEditConfig::default());
    }

    #[test]
    fn malformed_yaml_is_error() {
        assert!(parse_config("upload: [not, a, map").is_err());
    }

    #[test]
    fn config_file_lives_in_dir() {
        let path = config_file_path(Path::new("/tmp/fe"));
        assert_eq!(path, PathBuf::from("/tmp/fe/config.yaml"));
    }
}
