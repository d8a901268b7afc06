use std::collections::HashMap;
use std::sync::Arc;

use fileedit_core::FileProcessor;

/// Registry of file processors, looked up by tool id.
///
/// Tools without a dedicated processor, and general batches, use the default.
pub struct ProcessorRegistry {
    default: Arc<dyn FileProcessor>,
    by_tool: HashMap<String, Arc<dyn FileProcessor>>,
}

impl ProcessorRegistry {
    pub fn new(default: Arc<dyn FileProcessor>) -> Self {
        Self {
            default,
            by_tool: HashMap::new(),
        }
    }

    /// Register a processor for one tool.
    pub fn register(&mut self, tool_id: impl Into<String>, processor: Arc<dyn FileProcessor>) {
        self.by_tool.insert(tool_id.into(), processor);
    }

    pub fn resolve(&self, tool_id: Option<&str>) -> Arc<dyn FileProcessor> {
        tool_id
            .and_then(|id| self.by_tool.get(id))
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.default))
    }

    /// Tool ids with a dedicated processor.
    pub fn list(&self) -> Vec<String> {
        self.by_tool.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fileedit_core::{ProcessedArtifact, ProcessingError, ProcessingJob, ProgressReporter};

    struct Named(&'static str);

    #[async_trait]
    impl FileProcessor for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn process(
            &self,
            _job: &ProcessingJob,
            _progress: &ProgressReporter,
        ) -> Result<ProcessedArtifact, ProcessingError> {
            Ok(ProcessedArtifact::new("ok"))
        }
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let mut registry = ProcessorRegistry::new(Arc::new(Named("default")));
        registry.register("ocr-pdf", Arc::new(Named("ocr")));

        assert_eq!(registry.resolve(Some("ocr-pdf")).name(), "ocr");
        assert_eq!(registry.resolve(Some("merge-pdf")).name(), "default");
        assert_eq!(registry.resolve(None).name(), "default");
        assert_eq!(registry.list(), vec!["ocr-pdf".to_string()]);
    }
}
