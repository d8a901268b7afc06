//! Application state for one dashboard session.
//!
//! Owns the orchestrator, the activity history and the user's plan, and
//! is passed explicitly to whatever needs them.

use std::sync::Arc;

use tracing::info;

use fileedit_core::{
    ActivityRecord, FileEditError, IncomingFile, PipelineEvent, ToolCatalog, TrackedFile, UserPlan,
};

use crate::history::ActivityLog;
use crate::orchestrator::{BatchOrchestrator, OrchestratorConfig};
use crate::registry::ProcessorRegistry;
use crate::validator;

pub struct AppState {
    orchestrator: BatchOrchestrator,
    max_file_bytes: u64,
    plan: UserPlan,
}

impl AppState {
    pub fn new(
        log: Arc<ActivityLog>,
        processors: ProcessorRegistry,
        config: OrchestratorConfig,
        max_file_bytes: u64,
    ) -> Self {
        Self {
            orchestrator: BatchOrchestrator::new(log, processors, config),
            max_file_bytes,
            plan: UserPlan::default(),
        }
    }

    pub fn with_plan(mut self, plan: UserPlan) -> Self {
        self.plan = plan;
        self
    }

    /// Validate a batch and, if admitted, submit it for processing.
    ///
    /// A rejected batch creates no tracked files and publishes a
    /// `BatchRejected` event. Unknown tool ids are refused up front.
    pub async fn upload(
        &self,
        batch: Option<Vec<IncomingFile>>,
        tool_id: Option<&str>,
    ) -> Result<Vec<TrackedFile>, FileEditError> {
        if let Some(id) = tool_id {
            if ToolCatalog::by_id(id).is_none() {
                return Err(FileEditError::UnknownTool(id.to_string()));
            }
        }

        let admitted = match validator::validate(batch, self.max_file_bytes) {
            Ok(admitted) => admitted,
            Err(FileEditError::FileTooLarge { max_bytes, offending }) => {
                self.orchestrator.emit(PipelineEvent::BatchRejected {
                    max_bytes,
                    offending: offending.clone(),
                });
                return Err(FileEditError::FileTooLarge { max_bytes, offending });
            }
            Err(e) => return Err(e),
        };

        if admitted.is_empty() {
            return Ok(Vec::new());
        }
        info!(files = admitted.len(), tool = tool_id.unwrap_or("general"), "Upload admitted");
        Ok(self.orchestrator.submit(admitted, tool_id).await)
    }

    /// History filtered by a search query.
    pub async fn activities(&self, query: Option<&str>) -> Vec<ActivityRecord> {
        self.orchestrator.activity_log().query(query).await
    }

    /// Files shown in a tool's view.
    pub async fn files_for_tool(&self, tool_id: &str) -> Vec<TrackedFile> {
        self.orchestrator.filter_by_tool(tool_id).await
    }

    /// Whether intake must load file bytes for `tool_id`.
    pub fn needs_content(&self, tool_id: Option<&str>) -> bool {
        self.orchestrator.needs_content(tool_id)
    }

    pub fn orchestrator(&self) -> &BatchOrchestrator {
        &self.orchestrator
    }

    pub fn plan(&self) -> &UserPlan {
        &self.plan
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::SimulatedProcessor;
    use fileedit_core::FileStatus;
    use std::time::Duration;

    const MB: u64 = 1024 * 1024;

    fn state() -> AppState {
        let sim = SimulatedProcessor::new()
            .with_tick_interval(Duration::from_millis(1))
            .with_increment_range(25.0, 50.0);
        AppState::new(
            Arc::new(ActivityLog::new().with_entries(ActivityLog::sample_entries())),
            ProcessorRegistry::new(Arc::new(sim)),
            OrchestratorConfig::default(),
            50 * MB,
        )
    }

    #[tokio::test]
    async fn test_small_batch_is_admitted_and_processed() {
        let state = state();
        let batch = vec![IncomingFile::new("one.pdf", 1024), IncomingFile::new("two.pdf", 2048)];

        let created = state.upload(Some(batch), None).await.unwrap();
        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|f| f.status == FileStatus::Pending && f.progress == 0.0));

        state.orchestrator().wait_all().await;
        let history = state.activities(None).await;
        assert_eq!(history.len(), 4);
        assert!(history[..2].iter().all(|r| r.action == "Batch Processed"));
    }

    #[tokio::test]
    async fn test_oversized_batch_creates_no_files() {
        let state = state();
        let mut rx = state.orchestrator().subscribe();
        let batch = vec![IncomingFile::new("ok.pdf", MB), IncomingFile::new("huge.pdf", 60 * MB)];

        let err = state.upload(Some(batch), None).await.unwrap_err();
        assert!(matches!(err, FileEditError::FileTooLarge { max_bytes, .. } if max_bytes == 50 * MB));
        assert!(state.orchestrator().files().await.is_empty());

        match rx.try_recv().unwrap() {
            PipelineEvent::BatchRejected { offending, .. } => assert_eq!(offending, vec!["huge.pdf"]),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_refused() {
        let state = state();
        let err = state
            .upload(Some(vec![IncomingFile::new("a.pdf", 1)]), Some("teleport-pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, FileEditError::UnknownTool(_)));
    }

    #[tokio::test]
    async fn test_search_and_tool_views() {
        let state = state();
        state
            .upload(Some(vec![IncomingFile::new("Annual_report.docx", 10)]), Some("word-to-pdf"))
            .await
            .unwrap();
        state.orchestrator().wait_all().await;

        let hits = state.activities(Some("REPORT")).await;
        let names: Vec<_> = hits.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["Annual_report.docx", "Q4_Financial_Report.pdf"]);

        assert_eq!(state.files_for_tool("word-to-pdf").await.len(), 1);
        assert!(state.files_for_tool("merge-pdf").await.is_empty());
        assert_eq!(state.plan().usage_percent(), 75);
    }
}
