//! Wiring from the loaded configuration to runtime components.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use fileedit_config::{config_dir, config_file_path, load_and_prepare, FileEditConfig};
use fileedit_core::DocumentAi;
use fileedit_pipeline::{ActivityLog, AppState, OrchestratorConfig, ProcessorRegistry, SimulatedProcessor};
use fileedit_understanding::{DocumentAssistant, GeminiClient, OcrProcessor, OCR_TOOL_ID};

/// Load the config from `path`, or from the default location.
pub async fn load(path: Option<&Path>) -> Result<FileEditConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path(&config_dir()),
    };
    load_and_prepare(&path).await
}

/// The configured OCR provider, if an API key is available.
pub fn document_ai(config: &FileEditConfig) -> Option<Arc<dyn DocumentAi>> {
    let api_key = config.api_key()?;
    let ai = config.ai.clone().unwrap_or_default();

    let mut client = GeminiClient::new(api_key);
    if let Some(model) = ai.model {
        client = client.with_model(model);
    }
    if let Some(url) = ai.base_url {
        client = client.with_base_url(url);
    }
    Some(Arc::new(client))
}

pub fn simulator(config: &FileEditConfig) -> SimulatedProcessor {
    let (min, max) = config.increment_range();
    SimulatedProcessor::new()
        .with_tick_interval(Duration::from_millis(config.tick_interval_ms()))
        .with_increment_range(min, max)
        .with_artifact_base(config.artifact_base())
}

/// Simulator for every tool, plus the OCR processor when a provider is configured.
pub fn processors(config: &FileEditConfig) -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new(Arc::new(simulator(config)));

    match document_ai(config) {
        Some(ai) => {
            let ocr = OcrProcessor::new(DocumentAssistant::new(ai), config.artifact_base());
            registry.register(OCR_TOOL_ID, Arc::new(ocr));
            info!(tool = OCR_TOOL_ID, "Registered OCR processor");
        }
        None => warn!(tool = OCR_TOOL_ID, "No API key; OCR tool falls back to the simulator"),
    }

    registry
}

pub fn app_state(config: &FileEditConfig, seed_history: bool) -> AppState {
    let mut log = ActivityLog::with_capacity_limit(config.history_max_entries());
    if seed_history {
        log = log.with_entries(ActivityLog::sample_entries());
    }

    let orchestrator = OrchestratorConfig {
        task_timeout: config.task_timeout_secs().map(Duration::from_secs),
        ..Default::default()
    };

    AppState::new(Arc::new(log), processors(config), orchestrator, config.max_file_bytes())
}
