//! FileEdit runtime configuration schema.
//!
//! Every section and field is optional on disk; [`crate::defaults`] fills
//! the gaps after loading.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileEditConfig {
    /// Intake limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadConfig>,

    /// Simulated processing behaviour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing: Option<ProcessingConfig>,

    /// Activity history retention
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryConfig>,

    /// OCR / summarization provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_bytes: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_increment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_increment: Option<f64>,
    /// `0` disables the per-file timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_base: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling JSON log; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Effective values
// ---------------------------------------------------------------------------

impl FileEditConfig {
    pub fn max_file_bytes(&self) -> u64 {
        self.upload
            .as_ref()
            .and_then(|u| u.max_file_bytes)
            .unwrap_or(crate::defaults::DEFAULT_MAX_FILE_BYTES)
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.processing
            .as_ref()
            .and_then(|p| p.tick_interval_ms)
            .unwrap_or(crate::defaults::DEFAULT_TICK_INTERVAL_MS)
    }

    pub fn increment_range(&self) -> (f64, f64) {
        let p = self.processing.as_ref();
        (
            p.and_then(|p| p.min_increment)
                .unwrap_or(crate::defaults::DEFAULT_MIN_INCREMENT),
            p.and_then(|p| p.max_increment)
                .unwrap_or(crate::defaults::DEFAULT_MAX_INCREMENT),
        )
    }

    /// `None` when the timeout is disabled.
    pub fn task_timeout_secs(&self) -> Option<u64> {
        let secs = self
            .processing
            .as_ref()
            .and_then(|p| p.task_timeout_secs)
            .unwrap_or(crate::defaults::DEFAULT_TASK_TIMEOUT_SECS);
        (secs > 0).then_some(secs)
    }

    pub fn artifact_base(&self) -> &str {
        self.processing
            .as_ref()
            .and_then(|p| p.artifact_base.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_ARTIFACT_BASE)
    }

    pub fn history_max_entries(&self) -> usize {
        self.history
            .as_ref()
            .and_then(|h| h.max_entries)
            .unwrap_or(crate::defaults::DEFAULT_HISTORY_MAX_ENTRIES)
    }

    /// The API key, if one is configured and fully resolved.
    pub fn api_key(&self) -> Option<&str> {
        self.ai
            .as_ref()
            .and_then(|a| a.api_key.as_deref())
            .filter(|k| !k.trim().is_empty() && !crate::env::contains_env_var_reference(k))
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let raw = r#"
upload:
  maxFileBytes: 1024
processing:
  tickIntervalMs: 10
  taskTimeoutSecs: 0
history:
  maxEntries: 3
ai:
  apiKey: abc
"#;
        let cfg: FileEditConfig = serde_yaml::from_str(raw).unwrap();
        assert_eq!(cfg.max_file_bytes(), 1024);
        assert_eq!(cfg.tick_interval_ms(), 10);
        assert_eq!(cfg.task_timeout_secs(), None);
        assert_eq!(cfg.history_max_entries(), 3);
        assert_eq!(cfg.api_key(), Some("abc"));
    }

    #[test]
    fn empty_config_uses_builtin_values() {
        let cfg = FileEditConfig::default();
        assert_eq!(cfg.max_file_bytes(), 50 * 1024 * 1024);
        assert_eq!(cfg.increment_range(), (0.0, 15.0));
        assert_eq!(cfg.task_timeout_secs(), Some(300));
        assert_eq!(cfg.log_level(), "info");
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn unresolved_api_key_counts_as_missing() {
        let cfg = FileEditConfig {
            ai: Some(AiConfig {
                api_key: Some("${GEMINI_API_KEY}".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(cfg.api_key().is_none());
    }
}
