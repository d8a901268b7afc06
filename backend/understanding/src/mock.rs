use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use fileedit_core::{DocumentAi, FileEditError};

/// A mock document AI that returns canned responses.
pub struct MockDocumentAi {
    ocr: Result<String, String>,
    summary: Result<String, String>,
    calls: AtomicUsize,
}

impl Default for MockDocumentAi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDocumentAi {
    pub fn new() -> Self {
        Self {
            ocr: Ok("Mock extracted text".to_string()),
            summary: Ok("Mock summary".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_ocr_text(mut self, text: impl Into<String>) -> Self {
        self.ocr = Ok(text.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Ok(summary.into());
        self
    }

    /// Every call fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            ocr: Err(message.clone()),
            summary: Err(message),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self, canned: &Result<String, String>) -> Result<String, FileEditError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        canned
            .clone()
            .map_err(|message| FileEditError::external("mock", message))
    }
}

#[async_trait]
impl DocumentAi for MockDocumentAi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn perform_ocr(&self, _image: &[u8], _mime_type: &str) -> Result<String, FileEditError> {
        self.respond(&self.ocr)
    }

    async fn summarize(&self, _text: &str) -> Result<String, FileEditError> {
        self.respond(&self.summary)
    }
}
