//! `fileedit-pipeline`: the upload and processing pipeline.
//!
//! Intake flows through [`validator::validate`], is fanned out by the
//! [`BatchOrchestrator`] into one task per file, and lands in the
//! [`ActivityLog`] once each file terminates.

pub mod history;
pub mod orchestrator;
pub mod registry;
pub mod simulator;
pub mod state;
pub mod validator;

pub use history::{ActivityLog, DEFAULT_MAX_ENTRIES};
pub use orchestrator::{BatchOrchestrator, OrchestratorConfig};
pub use registry::ProcessorRegistry;
pub use simulator::{ProgressSteps, SimulatedProcessor};
pub use state::AppState;
pub use validator::{validate, MAX_FILE_BYTES};
