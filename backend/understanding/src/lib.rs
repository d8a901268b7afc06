pub mod assistant;
pub mod gemini;
pub mod mock;
pub mod ocr;

pub use assistant::{DocumentAssistant, NO_SUMMARY, NO_TEXT_FOUND, SUMMARY_UNAVAILABLE};
pub use gemini::GeminiClient;
pub use mock::MockDocumentAi;
pub use ocr::{OcrProcessor, OCR_TOOL_ID};
