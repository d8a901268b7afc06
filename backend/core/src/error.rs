use std::time::Duration;

use thiserror::Error;

use crate::format::format_file_size;

/// Top-level error type for the FileEdit pipeline.
#[derive(Debug, Error)]
pub enum FileEditError {
    #[error("some files are too large (max {})", ceiling(.max_bytes))]
    FileTooLarge { max_bytes: u64, offending: Vec<String> },

    #[error("processing failed for '{file}': {reason}")]
    ProcessingFailed { file: String, reason: String },

    #[error("processing of '{file}' timed out after {}", elapsed(.limit))]
    Timeout { file: String, limit: Duration },

    #[error("processing of '{file}' was cancelled")]
    Cancelled { file: String },

    #[error("{service} error: {message}")]
    ExternalService { service: String, message: String },

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FileEditError {
    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Batch-level errors are recoverable by reselecting files.
    pub fn is_batch_level(&self) -> bool {
        matches!(self, Self::FileTooLarge { .. })
    }
}

fn ceiling(max_bytes: &u64) -> String {
    format_file_size(*max_bytes)
}

/// `30s`, `1.5s`, or `250ms` below one second.
fn elapsed(limit: &Duration) -> String {
    if limit.as_secs() == 0 {
        format!("{}ms", limit.as_millis())
    } else if limit.subsec_millis() == 0 {
        format!("{}s", limit.as_secs())
    } else {
        format!("{:.1}s", limit.as_secs_f64())
    }
}

/// Terminal failure of a single file's unit of work.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessingError {
    #[error("{0}")]
    Failed(String),

    #[error("timed out after {}", elapsed(.0))]
    Timeout(Duration),

    #[error("cancelled")]
    Cancelled,

    #[error("external service: {0}")]
    External(String),
}

impl ProcessingError {
    pub fn into_file_error(self, file: impl Into<String>) -> FileEditError {
        let file = file.into();
        match self {
            Self::Failed(reason) => FileEditError::ProcessingFailed { file, reason },
            Self::Timeout(limit) => FileEditError::Timeout { file, limit },
            Self::Cancelled => FileEditError::Cancelled { file },
            Self::External(message) => FileEditError::ExternalService {
                service: "document-ai".into(),
                message,
            },
        }
    }
}

impl From<FileEditError> for ProcessingError {
    fn from(err: FileEditError) -> Self {
        match err {
            FileEditError::ExternalService { message, .. } => Self::External(message),
            FileEditError::Timeout { limit, .. } => Self::Timeout(limit),
            FileEditError::Cancelled { .. } => Self::Cancelled,
            other => Self::Failed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_too_large_message_uses_readable_ceiling() {
        let err = FileEditError::FileTooLarge {
            max_bytes: 50 * 1024 * 1024,
            offending: vec!["huge.pdf".into()],
        };
        assert_eq!(err.to_string(), "some files are too large (max 50 MB)");
        assert!(err.is_batch_level());
    }

    #[test]
    fn test_processing_error_conversion() {
        let err = ProcessingError::Timeout(Duration::from_secs(30)).into_file_error("a.pdf");
        assert_eq!(err.to_string(), "processing of 'a.pdf' timed out after 30s");
        assert!(!err.is_batch_level());

        let short = ProcessingError::Timeout(Duration::from_millis(250));
        assert_eq!(short.to_string(), "timed out after 250ms");
        let fractional = ProcessingError::Timeout(Duration::from_millis(1500)).into_file_error("b.pdf");
        assert_eq!(fractional.to_string(), "processing of 'b.pdf' timed out after 1.5s");

        let back: ProcessingError = FileEditError::external("gemini", "quota").into();
        assert_eq!(back, ProcessingError::External("quota".into()));
    }
}
