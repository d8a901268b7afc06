use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format::relative_time_label;

/// Opaque identity of a tracked file. Generated at intake, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(Uuid);

impl FileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of an activity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(Uuid);

impl ActivityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActivityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a tracked file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl FileStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Recognised document categories, resolved once from the file extension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Pdf,
    Word,
    Excel,
    PowerPoint,
    Image,
    Text,
    #[default]
    Other,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "doc" | "docx" | "odt" | "rtf" => Self::Word,
            "xls" | "xlsx" | "ods" | "csv" => Self::Excel,
            "ppt" | "pptx" | "odp" => Self::PowerPoint,
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp" | "tif" | "tiff" => Self::Image,
            "txt" | "md" => Self::Text,
            _ => Self::Other,
        }
    }

    /// Icon key used by the dashboard.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Pdf => "picture_as_pdf",
            Self::Word => "description",
            Self::Excel => "table_chart",
            Self::PowerPoint => "present_to_all",
            Self::Image => "image",
            Self::Text => "article",
            Self::Other => "draft",
        }
    }

    /// Best-effort MIME type for a given extension of this kind.
    pub fn mime_type(self, ext: &str) -> &'static str {
        match (self, ext) {
            (Self::Pdf, _) => "application/pdf",
            (Self::Image, "png") => "image/png",
            (Self::Image, "gif") => "image/gif",
            (Self::Image, "webp") => "image/webp",
            (Self::Image, "bmp") => "image/bmp",
            (Self::Image, "tif" | "tiff") => "image/tiff",
            (Self::Image, _) => "image/jpeg",
            (Self::Word, "docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            (Self::Word, _) => "application/msword",
            (Self::Excel, "xlsx") => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            (Self::Excel, "csv") => "text/csv",
            (Self::Excel, _) => "application/vnd.ms-excel",
            (Self::PowerPoint, "pptx") => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            (Self::PowerPoint, _) => "application/vnd.ms-powerpoint",
            (Self::Text, "md") => "text/markdown",
            (Self::Text, _) => "text/plain",
            (Self::Other, _) => "application/octet-stream",
        }
    }
}

/// Lowercased trailing extension of a file name, empty when there is none.
pub fn extension_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => String::new(),
    }
}

/// A file as handed over by the intake boundary (picker, drag-and-drop, CLI).
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    pub size: u64,
    pub content: Option<Bytes>,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            content: None,
        }
    }

    pub fn with_content(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len() as u64,
            content: Some(content),
        }
    }
}

/// The live record of one file under processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedFile {
    pub id: FileId,
    pub name: String,
    /// Lowercased trailing extension, possibly empty.
    pub file_type: String,
    pub kind: FileKind,
    pub size: u64,
    pub progress: f64,
    pub status: FileStatus,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    /// Tool that launched the processing; `None` means a general batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl TrackedFile {
    pub fn from_incoming(incoming: &IncomingFile, tool_used: Option<&str>) -> Self {
        let file_type = extension_of(&incoming.name);
        Self {
            id: FileId::new(),
            name: incoming.name.clone(),
            kind: FileKind::from_extension(&file_type),
            file_type,
            size: incoming.size,
            progress: 0.0,
            status: FileStatus::Pending,
            uploaded_at: Utc::now(),
            artifact: None,
            tool_used: tool_used.map(str::to_string),
            failure: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Untagged files are visible from every tool view, tagged ones only from their own.
    pub fn visible_to_tool(&self, tool_id: &str) -> bool {
        match &self.tool_used {
            Some(tool) => tool == tool_id,
            None => true,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type(&self.file_type)
    }
}

/// Terminal outcome as shown in the history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityOutcome {
    Completed,
    Failed,
}

impl fmt::Display for ActivityOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("Completed"),
            Self::Failed => f.write_str("Failed"),
        }
    }
}

/// Immutable history entry for a file that reached a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub file_name: String,
    pub file_type: String,
    pub action: String,
    /// Display label of the timestamp ("Just now", "Yesterday").
    pub date: String,
    pub recorded_at: DateTime<Utc>,
    pub status: ActivityOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl ActivityRecord {
    /// Build the history entry for a terminal file.
    pub fn for_file(file: &TrackedFile, action: impl Into<String>) -> Self {
        let status = match file.status {
            FileStatus::Completed => ActivityOutcome::Completed,
            _ => ActivityOutcome::Failed,
        };
        let recorded_at = Utc::now();
        Self {
            id: ActivityId::new(),
            file_name: file.name.clone(),
            file_type: file.file_type.clone(),
            action: action.into(),
            date: relative_time_label(recorded_at, recorded_at),
            recorded_at,
            status,
            download_url: file.artifact.clone(),
            failure: file.failure.clone(),
        }
    }

    /// Case-insensitive match against file name or action label.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.file_name.to_lowercase().contains(needle) || self.action.to_lowercase().contains(needle)
    }
}

/// Everything a processor needs to know about one file.
#[derive(Debug, Clone)]
pub struct ProcessingJob {
    pub file_id: FileId,
    pub name: String,
    pub file_type: String,
    pub kind: FileKind,
    pub size: u64,
    pub tool_used: Option<String>,
    pub content: Option<Bytes>,
}

impl ProcessingJob {
    pub fn new(file: &TrackedFile, content: Option<Bytes>) -> Self {
        Self {
            file_id: file.id,
            name: file.name.clone(),
            file_type: file.file_type.clone(),
            kind: file.kind,
            size: file.size,
            tool_used: file.tool_used.clone(),
            content,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type(&self.file_type)
    }
}

/// Output of a successful unit of work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessedArtifact {
    /// Opaque locator for the output, e.g. a download link.
    pub reference: String,
    /// Extracted text, for tools that produce any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ProcessedArtifact {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intake_resolves_type_and_kind() {
        let file = TrackedFile::from_incoming(&IncomingFile::new("Q4_Report.PDF", 2048), None);
        assert_eq!(file.file_type, "pdf");
        assert_eq!(file.kind, FileKind::Pdf);
        assert_eq!(file.status, FileStatus::Pending);
        assert_eq!(file.progress, 0.0);
        assert!(file.artifact.is_none());
        assert!(file.tool_used.is_none());
    }

    #[test]
    fn test_extension_may_be_empty() {
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of("archive.tar.GZ"), "gz");
        assert_eq!(FileKind::from_extension(""), FileKind::Other);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = TrackedFile::from_incoming(&IncomingFile::new("a.pdf", 1), None);
        let b = TrackedFile::from_incoming(&IncomingFile::new("a.pdf", 1), None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_tool_visibility() {
        let tagged =
            TrackedFile::from_incoming(&IncomingFile::new("a.pdf", 1), Some("compress-pdf"));
        let untagged = TrackedFile::from_incoming(&IncomingFile::new("b.pdf", 1), None);
        assert!(tagged.visible_to_tool("compress-pdf"));
        assert!(!tagged.visible_to_tool("merge-pdf"));
        assert!(untagged.visible_to_tool("merge-pdf"));
    }

    #[test]
    fn test_activity_record_serialization() {
        let mut file = TrackedFile::from_incoming(&IncomingFile::new("a.docx", 10), None);
        file.status = FileStatus::Completed;
        file.progress = 100.0;
        file.artifact = Some("blob:fileedit/1".into());
        let record = ActivityRecord::for_file(&file, "PDF Convert");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fileName"], "a.docx");
        assert_eq!(json["status"], "Completed");
        assert_eq!(json["downloadUrl"], "blob:fileedit/1");
        assert!(json.get("failure").is_none());
    }
}
