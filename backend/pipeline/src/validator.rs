//! Upload gate: all-or-nothing size check on an incoming batch.

use fileedit_core::{FileEditError, IncomingFile};
use tracing::{debug, warn};

/// Per-file upload ceiling (50 MB).
pub const MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// Admit a batch only if every file is within `max_bytes`.
///
/// An absent or empty batch is a no-op and yields an empty admission.
/// A single oversized file rejects the whole batch.
pub fn validate(
    batch: Option<Vec<IncomingFile>>,
    max_bytes: u64,
) -> Result<Vec<IncomingFile>, FileEditError> {
    let Some(batch) = batch else {
        return Ok(Vec::new());
    };

    let offending: Vec<String> = batch
        .iter()
        .filter(|f| f.size > max_bytes)
        .map(|f| f.name.clone())
        .collect();

    if !offending.is_empty() {
        warn!(
            rejected = batch.len(),
            oversized = ?offending,
            max_bytes,
            "Batch rejected: file too large"
        );
        return Err(FileEditError::FileTooLarge { max_bytes, offending });
    }

    debug!(files = batch.len(), "Batch admitted");
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn test_accepts_small_files_in_order() {
        let batch = vec![IncomingFile::new("a.pdf", 1024), IncomingFile::new("b.pdf", 2048)];
        let admitted = validate(Some(batch), 50 * MB).unwrap();
        let names: Vec<_> = admitted.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn test_one_oversized_file_rejects_everything() {
        let batch = vec![IncomingFile::new("small.pdf", 10), IncomingFile::new("big.mp4", 60 * MB)];
        match validate(Some(batch), 50 * MB) {
            Err(FileEditError::FileTooLarge { max_bytes, offending }) => {
                assert_eq!(max_bytes, 50 * MB);
                assert_eq!(offending, vec!["big.mp4".to_string()]);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_size_equal_to_ceiling_is_admitted() {
        let batch = vec![IncomingFile::new("edge.pdf", 50 * MB)];
        assert_eq!(validate(Some(batch), 50 * MB).unwrap().len(), 1);
    }

    #[test]
    fn test_absent_or_empty_batch_is_noop() {
        assert!(validate(None, MB).unwrap().is_empty());
        assert!(validate(Some(vec![]), MB).unwrap().is_empty());
    }
}
