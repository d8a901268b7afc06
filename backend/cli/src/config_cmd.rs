//! CLI Config Command
//!
//! Prints the effective configuration with secrets masked.

use anyhow::{Context, Result};

use fileedit_config::{redact_config, validate, FileEditConfig};

use crate::terminal_output::{note_info, note_warn};

pub fn run(config: &FileEditConfig) -> Result<()> {
    let redacted = redact_config(config)?;
    let yaml = serde_yaml::to_string(&redacted).context("Failed to render config as YAML")?;
    print!("{yaml}");

    let report = validate(config);
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    if report.warnings.is_empty() {
        note_info("Configuration has no warnings");
    }
    Ok(())
}
