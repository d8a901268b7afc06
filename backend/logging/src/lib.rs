//! Structured logging for FileEdit.
//!
//! Console plus rolling NDJSON file output, and secret scrubbing for
//! anything echoed from external services.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LOG_FILE_PREFIX};
pub use redact::redact_sensitive_data;
