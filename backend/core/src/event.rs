use serde::{Deserialize, Serialize};

use crate::types::{ActivityRecord, FileId, FileStatus, TrackedFile};

/// State changes published by the orchestrator to UI subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A file was admitted and is awaiting its first tick.
    Registered { file: TrackedFile },
    /// A progress tick was applied.
    Progress {
        file_id: FileId,
        progress: f64,
        status: FileStatus,
    },
    /// A file reached its terminal state.
    Finalized {
        file_id: FileId,
        status: FileStatus,
        artifact: Option<String>,
        text: Option<String>,
        failure: Option<String>,
    },
    /// A history entry was written.
    Recorded { activity: ActivityRecord },
    /// A batch failed validation; nothing was registered.
    BatchRejected { max_bytes: u64, offending: Vec<String> },
}

impl PipelineEvent {
    /// The file this event concerns, if any.
    pub fn file_id(&self) -> Option<FileId> {
        match self {
            Self::Registered { file } => Some(file.id),
            Self::Progress { file_id, .. } | Self::Finalized { file_id, .. } => Some(*file_id),
            Self::Recorded { .. } | Self::BatchRejected { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_is_tagged() {
        let id = FileId::new();
        let event = PipelineEvent::Progress {
            file_id: id,
            progress: 37.0,
            status: FileStatus::Processing,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["status"], "processing");
        assert_eq!(event.file_id(), Some(id));
    }
}
