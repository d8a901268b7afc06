//! `fileedit-config`: FileEdit runtime configuration management.
//!
//! Provides:
//! - Typed config schema (upload, processing, history, ai, logging)
//! - YAML loading with first-run defaults
//! - `${ENV_VAR}` substitution and `FILEEDIT_*` overrides
//! - Config redaction for safe display
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, apply_env_overrides_with, contains_env_var_reference, resolve_env_vars,
    resolve_env_vars_with, Substitution,
};
pub use io::{config_dir, config_file_path, load_config, parse_config};
pub use redact::{redact, redact_config};
pub use schema::FileEditConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime. Errors
/// in the report abort loading; warnings are logged.
pub async fn load_and_prepare(path: &Path) -> Result<FileEditConfig> {
    let raw_config = load_config(path).await?;
    prepare(raw_config, &std::env::vars().collect())
}

/// The post-load pipeline over an explicit environment.
pub fn prepare(raw_config: FileEditConfig, env: &HashMap<String, String>) -> Result<FileEditConfig> {
    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;

    let Substitution { value, unresolved } = resolve_env_vars_with(&value, env);
    if !unresolved.is_empty() {
        tracing::warn!(vars = ?unresolved, "Config references unset env vars");
    }

    let config: FileEditConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides_with(config, env);
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        bail!("{first}");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn prepare_resolves_key_and_fills_defaults() {
        let raw = parse_config("ai:\n  apiKey: ${GEMINI_API_KEY}\n").unwrap();
        let cfg = prepare(raw, &env(&[("GEMINI_API_KEY", "g-key")])).unwrap();
        assert_eq!(cfg.api_key(), Some("g-key"));
        assert_eq!(cfg.tick_interval_ms(), defaults::DEFAULT_TICK_INTERVAL_MS);
        assert_eq!(cfg.history_max_entries(), defaults::DEFAULT_HISTORY_MAX_ENTRIES);
    }

    #[test]
    fn prepare_keeps_unresolved_reference() {
        let raw = parse_config("ai:\n  apiKey: ${GEMINI_API_KEY}\n").unwrap();
        let cfg = prepare(raw, &HashMap::new()).unwrap();
        assert!(cfg.api_key().is_none());
        assert_eq!(
            cfg.ai.unwrap().api_key.as_deref(),
            Some("${GEMINI_API_KEY}")
        );
    }

    #[test]
    fn prepare_rejects_invalid_config() {
        let raw = parse_config("upload:\n  maxFileBytes: 0\n").unwrap();
        let err = prepare(raw, &HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("upload.maxFileBytes"));
    }

    #[test]
    fn prepare_rejects_zero_history_cap() {
        let raw = parse_config("history:\n  maxEntries: 0\n").unwrap();
        let err = prepare(raw, &HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("history.maxEntries"));
    }
}
