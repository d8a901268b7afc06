//! Config defaults: fills unset fields after loading.

use crate::schema::{
    AiConfig, FileEditConfig, HistoryConfig, LoggingConfig, ProcessingConfig, UploadConfig,
};

/// 50 MB per file.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 400;

pub const DEFAULT_MIN_INCREMENT: f64 = 0.0;

pub const DEFAULT_MAX_INCREMENT: f64 = 15.0;

pub const DEFAULT_TASK_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_ARTIFACT_BASE: &str = "blob:fileedit";

pub const DEFAULT_HISTORY_MAX_ENTRIES: usize = 500;

pub const DEFAULT_AI_PROVIDER: &str = "gemini";

pub const DEFAULT_AI_MODEL: &str = "gemini-3-flash-preview";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: FileEditConfig) -> FileEditConfig {
    let config = apply_upload_defaults(config);
    let config = apply_processing_defaults(config);
    let config = apply_history_defaults(config);
    let config = apply_ai_defaults(config);
    apply_logging_defaults(config)
}

fn apply_upload_defaults(mut config: FileEditConfig) -> FileEditConfig {
    let upload = config.upload.get_or_insert_with(UploadConfig::default);
    upload.max_file_bytes.get_or_insert(DEFAULT_MAX_FILE_BYTES);
    config
}

fn apply_processing_defaults(mut config: FileEditConfig) -> FileEditConfig {
    let processing = config.processing.get_or_insert_with(ProcessingConfig::default);
    processing.tick_interval_ms.get_or_insert(DEFAULT_TICK_INTERVAL_MS);
    processing.min_increment.get_or_insert(DEFAULT_MIN_INCREMENT);
    processing.max_increment.get_or_insert(DEFAULT_MAX_INCREMENT);
    processing.task_timeout_secs.get_or_insert(DEFAULT_TASK_TIMEOUT_SECS);
    if processing.artifact_base.is_none() {
        processing.artifact_base = Some(DEFAULT_ARTIFACT_BASE.to_string());
    }
    config
}

fn apply_history_defaults(mut config: FileEditConfig) -> FileEditConfig {
    let history = config.history.get_or_insert_with(HistoryConfig::default);
    history.max_entries.get_or_insert(DEFAULT_HISTORY_MAX_ENTRIES);
    config
}

/// Provider and model only; the API key has no default.
fn apply_ai_defaults(mut config: FileEditConfig) -> FileEditConfig {
    let ai = config.ai.get_or_insert_with(AiConfig::default);
    if ai.provider.is_none() {
        ai.provider = Some(DEFAULT_AI_PROVIDER.to_string());
    }
    if ai.model.is_none() {
        ai.model = Some(DEFAULT_AI_MODEL.to_string());
    }
    config
}

fn apply_logging_defaults(mut config: FileEditConfig) -> FileEditConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_section() {
        let cfg = apply_all_defaults(FileEditConfig::default());
        assert_eq!(cfg.upload.unwrap().max_file_bytes, Some(DEFAULT_MAX_FILE_BYTES));
        let processing = cfg.processing.unwrap();
        assert_eq!(processing.tick_interval_ms, Some(400));
        assert_eq!(processing.artifact_base.as_deref(), Some("blob:fileedit"));
        assert_eq!(cfg.history.unwrap().max_entries, Some(500));
        let ai = cfg.ai.unwrap();
        assert_eq!(ai.model.as_deref(), Some(DEFAULT_AI_MODEL));
        assert!(ai.api_key.is_none());
        assert_eq!(cfg.logging.unwrap().level.as_deref(), Some("info"));
    }

    #[test]
    fn does_not_override_user_values() {
        let cfg = FileEditConfig {
            processing: Some(ProcessingConfig {
                tick_interval_ms: Some(5),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cfg = apply_all_defaults(cfg);
        let processing = cfg.processing.unwrap();
        assert_eq!(processing.tick_interval_ms, Some(5));
        assert_eq!(processing.max_increment, Some(DEFAULT_MAX_INCREMENT));
    }
}
