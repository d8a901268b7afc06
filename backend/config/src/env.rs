//! Environment variable substitution and overrides for config values.
//!
//! Supports `${VAR_NAME}` syntax in string values, resolved at load time.
//! Only uppercase `[A-Z_][A-Z0-9_]*` variable names are matched. A
//! reference whose variable is unset or empty is left in place.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use crate::schema::{AiConfig, FileEditConfig, LoggingConfig, UploadConfig};

/// Pattern matching valid uppercase env var names.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

pub const ENV_MAX_FILE_BYTES: &str = "FILEEDIT_MAX_FILE_BYTES";
pub const ENV_LOG_LEVEL: &str = "FILEEDIT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FILEEDIT_LOG_DIR";
/// API key variables, in priority order.
pub const ENV_API_KEYS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Result of a substitution pass.
#[derive(Debug, Default)]
pub struct Substitution {
    pub value: Value,
    /// Variable names that were referenced but not set.
    pub unresolved: Vec<String>,
}

/// Substitute `${VAR}` references using the process environment.
pub fn resolve_env_vars(value: &Value) -> Substitution {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Substitution {
    let mut unresolved = Vec::new();
    let value = substitute_value(value, env, "", &mut unresolved);
    unresolved.sort();
    unresolved.dedup();
    Substitution { value, unresolved }
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
    unresolved: &mut Vec<String>,
) -> Value {
    match value {
        Value::String(s) => Value::String(substitute_string(s, env, path, unresolved)),
        Value::Array(arr) => Value::Array(
            arr.iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]"), unresolved))
                .collect(),
        ),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path, unresolved));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
    unresolved: &mut Vec<String>,
) -> String {
    if !s.contains('$') {
        return s.to_string();
    }

    ENV_VAR_PATTERN
        .replace_all(s, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match env.get(var_name) {
                Some(val) if !val.is_empty() => val.clone(),
                _ => {
                    warn!(var = var_name, config_path = path, "Env var not set; leaving reference");
                    unresolved.push(var_name.to_string());
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

/// Check whether a string contains any env var references.
pub fn contains_env_var_reference(s: &str) -> bool {
    s.contains('$') && ENV_VAR_PATTERN.is_match(s)
}

/// Apply `FILEEDIT_*` and API key overrides from the process environment.
pub fn apply_env_overrides(config: FileEditConfig) -> FileEditConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

pub fn apply_env_overrides_with(
    mut config: FileEditConfig,
    env: &HashMap<String, String>,
) -> FileEditConfig {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(raw) = get(ENV_MAX_FILE_BYTES) {
        match raw.parse::<u64>() {
            Ok(bytes) => {
                config
                    .upload
                    .get_or_insert_with(UploadConfig::default)
                    .max_file_bytes = Some(bytes);
            }
            Err(_) => warn!(var = ENV_MAX_FILE_BYTES, value = raw, "Ignoring non-numeric override"),
        }
    }

    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.to_string());
    }
    if let Some(dir) = get(ENV_LOG_DIR) {
        config.logging.get_or_insert_with(LoggingConfig::default).dir = Some(dir.to_string());
    }

    if let Some(key) = ENV_API_KEYS.iter().find_map(|k| get(*k)) {
        let ai = config.ai.get_or_insert_with(AiConfig::default);
        let configured = ai
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty() && !contains_env_var_reference(k));
        if !configured {
            ai.api_key = Some(key.to_string());
        }
    }

    config
}
