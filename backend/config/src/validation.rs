//! Config validation: range checks with user-friendly error messages.

use crate::env::contains_env_var_reference;
use crate::schema::FileEditConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &FileEditConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_upload(config, &mut report);
    validate_processing(config, &mut report);
    validate_history(config, &mut report);
    validate_ai(config, &mut report);
    report
}

fn validate_upload(config: &FileEditConfig, report: &mut ValidationReport) {
    if config.max_file_bytes() == 0 {
        report.error("upload.maxFileBytes", "maxFileBytes must be > 0");
    }
}

fn validate_processing(config: &FileEditConfig, report: &mut ValidationReport) {
    if config.tick_interval_ms() == 0 {
        report.error("processing.tickIntervalMs", "tickIntervalMs must be > 0");
    }
    let (min, max) = config.increment_range();
    if !min.is_finite() || !max.is_finite() {
        report.error("processing", "increments must be finite numbers");
        return;
    }
    if max <= 0.0 {
        report.error("processing.maxIncrement", "maxIncrement must be > 0");
    }
    if min > max {
        report.error(
            "processing.minIncrement",
            format!("minIncrement ({min}) must not exceed maxIncrement ({max})"),
        );
    }
    if min < 0.0 {
        report.error("processing.minIncrement", "minIncrement must be >= 0");
    }
}

fn validate_history(config: &FileEditConfig, report: &mut ValidationReport) {
    if config.history_max_entries() == 0 {
        report.error("history.maxEntries", "maxEntries must be > 0");
    }
}

fn validate_ai(config: &FileEditConfig, report: &mut ValidationReport) {
    let raw = config.ai.as_ref().and_then(|a| a.api_key.as_deref());
    match raw {
        Some(key) if contains_env_var_reference(key) => report.warn(
            "ai.apiKey",
            "apiKey references an unset env var; OCR is unavailable",
        ),
        _ if config.api_key().is_none() => {
            report.warn("ai.apiKey", "No API key configured; OCR is unavailable")
        }
        _ => {}
    }
    if let Some(provider) = config.ai.as_ref().and_then(|a| a.provider.as_deref()) {
        if provider != "gemini" {
            report.error("ai.provider", format!("Unknown provider '{provider}'. Use 'gemini'"));
        }
    }
}
