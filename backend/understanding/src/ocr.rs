//! OCR processor: runs uploaded scans through the document AI instead of
//! the simulator, behind the same processor contract.

use async_trait::async_trait;
use tracing::info;

use fileedit_core::{FileProcessor, ProcessedArtifact, ProcessingError, ProcessingJob, ProgressReporter};

use crate::assistant::DocumentAssistant;

pub const OCR_TOOL_ID: &str = "ocr-pdf";

pub struct OcrProcessor {
    assistant: DocumentAssistant,
    artifact_base: String,
}

impl OcrProcessor {
    pub fn new(assistant: DocumentAssistant, artifact_base: impl Into<String>) -> Self {
        Self {
            assistant,
            artifact_base: artifact_base.into(),
        }
    }
}

#[async_trait]
impl FileProcessor for OcrProcessor {
    fn name(&self) -> &str {
        "ocr"
    }

    fn needs_content(&self) -> bool {
        true
    }

    async fn process(
        &self,
        job: &ProcessingJob,
        progress: &ProgressReporter,
    ) -> Result<ProcessedArtifact, ProcessingError> {
        let Some(content) = &job.content else {
            return Err(ProcessingError::Failed("no file content to read".into()));
        };

        progress.report(10.0).await;
        info!(
            file_id = %job.file_id,
            provider = self.assistant.provider(),
            mime = job.mime_type(),
            "Extracting text"
        );
        let text = self.assistant.extract_text(content, job.mime_type()).await?;
        progress.report(90.0).await;

        Ok(ProcessedArtifact {
            reference: format!("{}/{}.txt", self.artifact_base, job.file_id),
            text: Some(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDocumentAi;
    use fileedit_core::{FileId, IncomingFile, ProgressSink, TrackedFile};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        ticks: Mutex<Vec<f64>>,
    }

    #[async_trait]
    impl ProgressSink for Recorder {
        async fn on_progress(&self, _file_id: FileId, progress: f64) {
            self.ticks.lock().await.push(progress);
        }
    }

    fn job(incoming: IncomingFile) -> ProcessingJob {
        let file = TrackedFile::from_incoming(&incoming, Some(OCR_TOOL_ID));
        ProcessingJob::new(&file, incoming.content)
    }

    #[tokio::test]
    async fn test_ocr_processor_returns_text_artifact() {
        let ai = Arc::new(MockDocumentAi::new().with_ocr_text("Scanned page"));
        let processor = OcrProcessor::new(DocumentAssistant::new(ai.clone()), "blob:ocr");
        let recorder = Arc::new(Recorder::default());
        let job = job(IncomingFile::with_content("scan.png", b"fake-png".to_vec()));
        let reporter = ProgressReporter::new(job.file_id, recorder.clone());

        let artifact = processor.process(&job, &reporter).await.unwrap();
        assert_eq!(artifact.text.as_deref(), Some("Scanned page"));
        assert_eq!(artifact.reference, format!("blob:ocr/{}.txt", job.file_id));
        assert_eq!(*recorder.ticks.lock().await, vec![10.0, 90.0]);
        assert_eq!(ai.calls(), 1);
        assert!(processor.needs_content());
    }

    #[tokio::test]
    async fn test_missing_content_fails_without_calling_provider() {
        let ai = Arc::new(MockDocumentAi::new());
        let processor = OcrProcessor::new(DocumentAssistant::new(ai.clone()), "blob:ocr");
        let job = job(IncomingFile::new("scan.pdf", 100));
        let reporter = ProgressReporter::new(job.file_id, Arc::new(Recorder::default()));

        let err = processor.process(&job, &reporter).await.unwrap_err();
        assert!(matches!(err, ProcessingError::Failed(_)));
        assert_eq!(ai.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_external_error() {
        let processor = OcrProcessor::new(
            DocumentAssistant::new(Arc::new(MockDocumentAi::failing("503"))),
            "blob:ocr",
        );
        let job = job(IncomingFile::with_content("scan.jpg", b"jpg".to_vec()));
        let reporter = ProgressReporter::new(job.file_id, Arc::new(Recorder::default()));

        let err = processor.process(&job, &reporter).await.unwrap_err();
        assert_eq!(err, ProcessingError::External("Failed to process document with Mock.".into()));
    }
}
