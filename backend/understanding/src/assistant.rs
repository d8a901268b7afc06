//! Document assistant: applies user-facing fallbacks on top of a
//! [`DocumentAi`] provider.

use std::sync::Arc;

use tracing::{error, warn};

use fileedit_core::{DocumentAi, FileEditError};

pub const NO_TEXT_FOUND: &str = "No text found.";
pub const NO_SUMMARY: &str = "Could not generate summary.";
pub const SUMMARY_UNAVAILABLE: &str = "Summarization unavailable.";

#[derive(Clone)]
pub struct DocumentAssistant {
    ai: Arc<dyn DocumentAi>,
}

impl DocumentAssistant {
    pub fn new(ai: Arc<dyn DocumentAi>) -> Self {
        Self { ai }
    }

    pub fn provider(&self) -> &str {
        self.ai.name()
    }

    /// OCR an image. Empty results become [`NO_TEXT_FOUND`]; provider
    /// failures are reported as an `ExternalService` error.
    pub async fn extract_text(&self, image: &[u8], mime_type: &str) -> Result<String, FileEditError> {
        match self.ai.perform_ocr(image, mime_type).await {
            Ok(text) if text.trim().is_empty() => Ok(NO_TEXT_FOUND.to_string()),
            Ok(text) => Ok(text),
            Err(e) => {
                error!(provider = self.ai.name(), error = %e, "OCR failed");
                Err(FileEditError::external(
                    self.ai.name(),
                    format!("Failed to process document with {}.", display_name(self.ai.name())),
                ))
            }
        }
    }

    /// Summarize text. Never fails: provider errors are recovered locally.
    pub async fn summarize(&self, text: &str) -> String {
        match self.ai.summarize(text).await {
            Ok(summary) if summary.trim().is_empty() => NO_SUMMARY.to_string(),
            Ok(summary) => summary,
            Err(e) => {
                warn!(provider = self.ai.name(), error = %e, "Summarization failed");
                SUMMARY_UNAVAILABLE.to_string()
            }
        }
    }
}

/// `gemini` -> `Gemini`.
fn display_name(provider: &str) -> String {
    let mut chars = provider.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
