//! CLI OCR Command
//!
//! Sends one image straight to the document AI and prints the text.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tokio::fs;

use fileedit_config::FileEditConfig;
use fileedit_core::types::extension_of;
use fileedit_core::{format_file_size, FileKind, IncomingFile};
use fileedit_logging::redact_sensitive_data;
use fileedit_pipeline::validate;
use fileedit_understanding::DocumentAssistant;

use crate::config::document_ai;
use crate::terminal_output::{note_info, paint, BOLD};

pub async fn run(config: &FileEditConfig, image: &Path, summarize: bool) -> Result<()> {
    let ai = document_ai(config).ok_or_else(|| {
        anyhow!("No API key configured. Set GEMINI_API_KEY or ai.apiKey in the config file")
    })?;
    let assistant = DocumentAssistant::new(ai);

    let name = crate::process_cmd::file_name(image)?;
    let bytes = fs::read(image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;
    let admitted = validate(
        Some(vec![IncomingFile::with_content(name.clone(), bytes)]),
        config.max_file_bytes(),
    )?;
    let Some(content) = admitted.into_iter().next().and_then(|f| f.content) else {
        return Ok(());
    };

    let ext = extension_of(&name);
    let mime = FileKind::from_extension(&ext).mime_type(&ext);
    note_info(&format!("Reading {name} ({}, {mime})", format_file_size(content.len() as u64)));

    let text = assistant
        .extract_text(&content, mime)
        .await
        .map_err(|e| anyhow!(redact_sensitive_data(&e.to_string())))?;
    println!("\n{}\n{text}", paint("Extracted text", BOLD));

    if summarize {
        let summary = assistant.summarize(&text).await;
        println!("\n{}\n{summary}", paint("Summary", BOLD));
    }
    Ok(())
}
