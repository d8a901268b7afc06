pub mod catalog;
pub mod error;
pub mod event;
pub mod format;
pub mod plan;
pub mod traits;
pub mod types;

pub use catalog::{ToolCatalog, ToolCategory, ToolDescriptor, DEFAULT_ACTION};
pub use error::{FileEditError, ProcessingError};
pub use event::PipelineEvent;
pub use format::{format_file_size, relative_time_label};
pub use plan::UserPlan;
pub use traits::{DocumentAi, FileProcessor, ProgressReporter, ProgressSink};
pub use types::{
    ActivityId, ActivityOutcome, ActivityRecord, FileId, FileKind, FileStatus, IncomingFile,
    ProcessedArtifact, ProcessingJob, TrackedFile,
};
