//! Batch orchestrator: fans an admitted batch out into one task per file,
//! tracks each file's live state, and records exactly one history entry
//! per file when it terminates.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use fileedit_core::{
    ActivityRecord, FileId, FileProcessor, FileStatus, IncomingFile, PipelineEvent,
    ProcessedArtifact, ProcessingError, ProcessingJob, ProgressReporter, ProgressSink, ToolCatalog,
    TrackedFile,
};

use crate::history::ActivityLog;
use crate::registry::ProcessorRegistry;

/// Default broadcast buffer for pipeline events.
const DEFAULT_EVENT_BUFFER: usize = 1024;

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Ceiling on a single file's total processing time. `None` disables it.
    pub task_timeout: Option<Duration>,
    pub event_buffer: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            task_timeout: Some(Duration::from_secs(300)),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

/// Cheap-to-clone handle over the shared orchestrator state.
#[derive(Clone)]
pub struct BatchOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    files: RwLock<Vec<TrackedFile>>,
    log: Arc<ActivityLog>,
    processors: ProcessorRegistry,
    events: broadcast::Sender<PipelineEvent>,
    cancellers: Mutex<HashMap<FileId, watch::Sender<bool>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    task_timeout: Option<Duration>,
}

impl BatchOrchestrator {
    pub fn new(
        log: Arc<ActivityLog>,
        processors: ProcessorRegistry,
        config: OrchestratorConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            inner: Arc::new(Inner {
                files: RwLock::new(Vec::new()),
                log,
                processors,
                events,
                cancellers: Mutex::new(HashMap::new()),
                tasks: Mutex::new(Vec::new()),
                task_timeout: config.task_timeout,
            }),
        }
    }

    /// Register every file of an admitted batch, then launch one task per file.
    ///
    /// The returned records are snapshots taken before any task starts, so
    /// they are all `pending` at progress 0.
    pub async fn submit(&self, batch: Vec<IncomingFile>, tool_id: Option<&str>) -> Vec<TrackedFile> {
        if batch.is_empty() {
            return Vec::new();
        }

        let processor = self.inner.processors.resolve(tool_id);
        let mut created = Vec::with_capacity(batch.len());
        let mut jobs = Vec::with_capacity(batch.len());
        {
            let mut files = self.inner.files.write().await;
            for incoming in batch {
                let file = TrackedFile::from_incoming(&incoming, tool_id);
                jobs.push(ProcessingJob::new(&file, incoming.content));
                files.push(file.clone());
                created.push(file);
            }
        }

        info!(
            files = created.len(),
            tool = tool_id.unwrap_or("general"),
            processor = processor.name(),
            "Batch submitted"
        );
        for file in &created {
            self.inner.emit(PipelineEvent::Registered { file: file.clone() });
        }

        let mut tasks = self.inner.tasks.lock().await;
        let mut cancellers = self.inner.cancellers.lock().await;
        for job in jobs {
            let (cancel_tx, cancel_rx) = watch::channel(false);
            cancellers.insert(job.file_id, cancel_tx);

            let inner = Arc::clone(&self.inner);
            let processor = Arc::clone(&processor);
            tasks.push(tokio::spawn(async move {
                inner.run(job, processor, cancel_rx).await;
            }));
        }

        created
    }

    /// Request cancellation of a file still in flight.
    pub async fn cancel(&self, file_id: FileId) -> bool {
        match self.inner.cancellers.lock().await.get(&file_id) {
            Some(tx) => {
                info!(file_id = %file_id, "Cancellation requested");
                tx.send(true).is_ok()
            }
            None => false,
        }
    }

    /// Finalize a file with a terminal outcome.
    ///
    /// Returns `false` when the file is unknown or already terminal; in that
    /// case no history entry is written.
    pub async fn finalize(
        &self,
        file_id: FileId,
        outcome: Result<ProcessedArtifact, ProcessingError>,
    ) -> bool {
        self.inner.finalize(file_id, outcome).await
    }

    /// Snapshot of all files of the session, in intake order.
    pub async fn files(&self) -> Vec<TrackedFile> {
        self.inner.files.read().await.clone()
    }

    pub async fn file(&self, file_id: FileId) -> Option<TrackedFile> {
        self.inner.files.read().await.iter().find(|f| f.id == file_id).cloned()
    }

    /// Files tagged with `tool_id` plus every untagged file.
    pub async fn filter_by_tool(&self, tool_id: &str) -> Vec<TrackedFile> {
        self.inner
            .files
            .read()
            .await
            .iter()
            .filter(|f| f.visible_to_tool(tool_id))
            .cloned()
            .collect()
    }

    /// Whether any file is still pending or processing.
    pub async fn is_processing(&self) -> bool {
        self.inner.files.read().await.iter().any(|f| !f.is_terminal())
    }

    /// Whether the processor serving `tool_id` reads file content.
    pub fn needs_content(&self, tool_id: Option<&str>) -> bool {
        self.inner.processors.resolve(tool_id).needs_content()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.inner.events.subscribe()
    }

    pub fn activity_log(&self) -> &Arc<ActivityLog> {
        &self.inner.log
    }

    /// Wait until every launched task has finished.
    pub async fn wait_all(&self) {
        loop {
            let handles = std::mem::take(&mut *self.inner.tasks.lock().await);
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    error!(error = %e, "File task failed to join");
                }
            }
        }
    }

    /// Publish a batch-level event that is not tied to any tracked file.
    pub(crate) fn emit(&self, event: PipelineEvent) {
        self.inner.emit(event);
    }
}

impl Inner {
    fn emit(&self, event: PipelineEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    async fn run(
        self: Arc<Self>,
        job: ProcessingJob,
        processor: Arc<dyn FileProcessor>,
        mut cancel_rx: watch::Receiver<bool>,
    ) {
        let file_id = job.file_id;
        let reporter = ProgressReporter::new(file_id, Arc::clone(&self) as Arc<dyn ProgressSink>);
        debug!(file_id = %file_id, processor = processor.name(), "File task started");

        let mut work = tokio::spawn(async move { processor.process(&job, &reporter).await });

        let timeout = self.task_timeout;
        let deadline = async move {
            match timeout {
                Some(limit) => {
                    tokio::time::sleep(limit).await;
                    limit
                }
                None => std::future::pending().await,
            }
        };

        let outcome = tokio::select! {
            joined = &mut work => match joined {
                Ok(result) => result,
                Err(e) => {
                    error!(file_id = %file_id, error = %e, "Processor task aborted");
                    Err(ProcessingError::Failed(format!("processor aborted: {e}")))
                }
            },
            limit = deadline => {
                work.abort();
                warn!(file_id = %file_id, limit_secs = limit.as_secs_f64(), "File processing timed out");
                Err(ProcessingError::Timeout(limit))
            }
            _ = cancelled(&mut cancel_rx) => {
                work.abort();
                Err(ProcessingError::Cancelled)
            }
        };

        self.finalize(file_id, outcome).await;
    }

    async fn apply_progress(&self, file_id: FileId, progress: f64) {
        let (progress, status) = {
            let mut files = self.files.write().await;
            let Some(file) = files.iter_mut().find(|f| f.id == file_id) else {
                warn!(file_id = %file_id, "Progress for unknown file ignored");
                return;
            };
            if file.is_terminal() {
                debug!(file_id = %file_id, "Progress after finalization ignored");
                return;
            }
            if !progress.is_finite() || progress < file.progress {
                debug!(file_id = %file_id, progress, current = file.progress, "Regressive progress ignored");
                return;
            }
            if progress >= 100.0 {
                // Completion is reached only through finalization.
                debug!(file_id = %file_id, "Final tick received; awaiting result");
                return;
            }

            file.progress = progress;
            if progress > 0.0 && file.status == FileStatus::Pending {
                file.status = FileStatus::Processing;
            }
            (file.progress, file.status)
        };

        self.emit(PipelineEvent::Progress { file_id, progress, status });
    }

    async fn finalize(
        &self,
        file_id: FileId,
        outcome: Result<ProcessedArtifact, ProcessingError>,
    ) -> bool {
        let mut files = self.files.write().await;
        let Some(file) = files.iter_mut().find(|f| f.id == file_id) else {
            warn!(file_id = %file_id, "Terminal report for unknown file ignored");
            return false;
        };
        if file.is_terminal() {
            warn!(file_id = %file_id, status = %file.status, "Duplicate terminal report ignored");
            return false;
        }

        let text = match outcome {
            Ok(artifact) => {
                file.status = FileStatus::Completed;
                file.progress = 100.0;
                file.artifact = Some(artifact.reference);
                artifact.text
            }
            Err(e) => {
                file.status = FileStatus::Failed;
                file.artifact = None;
                file.failure = Some(e.to_string());
                None
            }
        };

        info!(
            file_id = %file_id,
            file = %file.name,
            status = %file.status,
            failure = file.failure.as_deref().unwrap_or(""),
            "File finalized"
        );

        let record = ActivityRecord::for_file(file, ToolCatalog::action_label(file.tool_used.as_deref()));
        self.emit(PipelineEvent::Finalized {
            file_id,
            status: file.status,
            artifact: file.artifact.clone(),
            text,
            failure: file.failure.clone(),
        });

        // Recorded under the files lock so the log follows completion order.
        self.log.record(record.clone()).await;
        drop(files);

        self.cancellers.lock().await.remove(&file_id);
        self.emit(PipelineEvent::Recorded { activity: record });
        true
    }
}

#[async_trait]
impl ProgressSink for Inner {
    async fn on_progress(&self, file_id: FileId, progress: f64) {
        self.apply_progress(file_id, progress).await;
    }
}

/// Resolves once cancellation is requested; never resolves if the sender is gone.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
