use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{FileEditError, ProcessingError};
use crate::types::{FileId, ProcessedArtifact, ProcessingJob};

/// A unit of work that turns one uploaded file into an artifact.
///
/// Implementations report progress through the given reporter and resolve
/// exactly once. Converters, compressors and OCR all sit behind this trait;
/// the simulator is the default implementation.
#[async_trait]
pub trait FileProcessor: Send + Sync {
    /// Human-readable name of this processor.
    fn name(&self) -> &str;

    /// Whether the processor reads file bytes; intake skips loading them otherwise.
    fn needs_content(&self) -> bool {
        false
    }

    async fn process(
        &self,
        job: &ProcessingJob,
        progress: &ProgressReporter,
    ) -> Result<ProcessedArtifact, ProcessingError>;
}

/// Receiver of progress ticks, keyed by file identity.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn on_progress(&self, file_id: FileId, progress: f64);
}

/// Progress handle bound to a single file.
#[derive(Clone)]
pub struct ProgressReporter {
    file_id: FileId,
    sink: Arc<dyn ProgressSink>,
}

impl ProgressReporter {
    pub fn new(file_id: FileId, sink: Arc<dyn ProgressSink>) -> Self {
        Self { file_id, sink }
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub async fn report(&self, progress: f64) {
        self.sink.on_progress(self.file_id, progress).await;
    }
}

/// External OCR and summarization capability.
#[async_trait]
pub trait DocumentAi: Send + Sync {
    /// Provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Extract the text visible in an image.
    async fn perform_ocr(&self, image: &[u8], mime_type: &str) -> Result<String, FileEditError>;

    /// Produce a concise summary of a document's text.
    async fn summarize(&self, text: &str) -> Result<String, FileEditError>;
}
