//! Gemini document AI: OCR and summarization over the `generateContent` API.
use anyhow::Context;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use fileedit_core::{DocumentAi, FileEditError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

const OCR_PROMPT: &str =
    "Extract all text from this image as accurately as possible. Output only the text found.";
const SUMMARY_PROMPT: &str = "Please provide a concise summary of the following document content:";

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, body: &Value) -> anyhow::Result<String> {
        debug!(model = %self.model, "Sending request to Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            // the URL carries the API key
            .map_err(|e| e.without_url())
            .context("Gemini HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini returned {}: {}", status, error_body);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;
        Ok(parsed.text())
    }
}

pub(crate) fn ocr_request(image: &[u8], mime_type: &str) -> Value {
    json!({
        "contents": [{ "parts": [
            { "inlineData": { "data": STANDARD.encode(image), "mimeType": mime_type } },
            { "text": OCR_PROMPT }
        ]}]
    })
}

pub(crate) fn summary_request(text: &str) -> Value {
    json!({
        "contents": [{ "parts": [
            { "text": format!("{SUMMARY_PROMPT}\n\n{text}") }
        ]}]
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate; empty when there is none.
    pub(crate) fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect::<String>())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentAi for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn perform_ocr(&self, image: &[u8], mime_type: &str) -> Result<String, FileEditError> {
        info!(bytes = image.len(), mime = %mime_type, "Running OCR via Gemini");
        self.generate(&ocr_request(image, mime_type))
            .await
            .map_err(|e| FileEditError::external("gemini", format!("{e:#}")))
    }

    async fn summarize(&self, text: &str) -> Result<String, FileEditError> {
        info!(chars = text.len(), "Summarizing via Gemini");
        self.generate(&summary_request(text))
            .await
            .map_err(|e| FileEditError::external("gemini", format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocr_request_inlines_base64_image() {
        let body = ocr_request(b"png-bytes", "image/png");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], STANDARD.encode(b"png-bytes"));
        assert_eq!(parts[1]["text"], OCR_PROMPT);
    }

    #[test]
    fn test_summary_request_embeds_content() {
        let body = summary_request("Quarterly numbers are up.");
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.starts_with(SUMMARY_PROMPT));
        assert!(text.ends_with("\n\nQuarterly numbers are up."));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let raw = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello " }, { "text": "world" }] } }]
        });
        let parsed: GenerateResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.text(), "Hello world");

        let empty: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = GeminiClient::new("k").with_base_url("http://localhost:9999/v1beta/").with_model("m");
        assert_eq!(client.endpoint(), "http://localhost:9999/v1beta/models/m:generateContent");
    }
}
