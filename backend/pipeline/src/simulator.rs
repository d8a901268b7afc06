//! Simulated processor: fabricates monotonically increasing progress on a
//! fixed tick and resolves with a placeholder artifact.
//!
//! Stands in for real converters and compressors behind the same
//! [`FileProcessor`] contract.

use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use fileedit_core::{FileProcessor, ProcessedArtifact, ProcessingError, ProcessingJob, ProgressReporter};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(400);
pub const DEFAULT_MIN_INCREMENT: f64 = 0.0;
pub const DEFAULT_MAX_INCREMENT: f64 = 15.0;
pub const DEFAULT_ARTIFACT_BASE: &str = "blob:fileedit";

/// Progress at which a file marked for failure gives up.
const SIMULATED_FAILURE_POINT: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct SimulatedProcessor {
    tick_interval: Duration,
    min_increment: f64,
    max_increment: f64,
    seed: Option<u64>,
    artifact_base: String,
    fail_names: Vec<String>,
}

impl Default for SimulatedProcessor {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            min_increment: DEFAULT_MIN_INCREMENT,
            max_increment: DEFAULT_MAX_INCREMENT,
            seed: None,
            artifact_base: DEFAULT_ARTIFACT_BASE.to_string(),
            fail_names: Vec::new(),
        }
    }
}

impl SimulatedProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Increment range per tick. A non-positive upper bound would never
    /// finish, so it falls back to the default range.
    pub fn with_increment_range(mut self, min: f64, max: f64) -> Self {
        if !min.is_finite() || !max.is_finite() || max <= 0.0 || min > max || min < 0.0 {
            warn!(min, max, "Invalid increment range; using default");
            self.min_increment = DEFAULT_MIN_INCREMENT;
            self.max_increment = DEFAULT_MAX_INCREMENT;
        } else {
            self.min_increment = min;
            self.max_increment = max;
        }
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_artifact_base(mut self, base: impl Into<String>) -> Self {
        self.artifact_base = base.into();
        self
    }

    /// Files with these exact names fail midway instead of completing.
    pub fn with_fail_names(mut self, names: Vec<String>) -> Self {
        self.fail_names = names;
        self
    }

    /// The lazy sequence of progress values for one run, ending with exactly 100.
    pub fn progress_steps(&self) -> ProgressSteps {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        ProgressSteps {
            rng,
            current: 0.0,
            min_increment: self.min_increment,
            max_increment: self.max_increment,
            done: false,
        }
    }
}

#[async_trait]
impl FileProcessor for SimulatedProcessor {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn process(
        &self,
        job: &ProcessingJob,
        progress: &ProgressReporter,
    ) -> Result<ProcessedArtifact, ProcessingError> {
        let should_fail = self.fail_names.iter().any(|n| n == &job.name);

        for value in self.progress_steps() {
            tokio::time::sleep(self.tick_interval).await;
            if should_fail && value >= SIMULATED_FAILURE_POINT {
                debug!(file_id = %job.file_id, progress = value, "Simulated failure");
                return Err(ProcessingError::Failed("simulated failure".into()));
            }
            progress.report(value).await;
        }

        Ok(ProcessedArtifact::new(format!("{}/{}", self.artifact_base, job.file_id)))
    }
}

/// Iterator over simulated progress values.
///
/// Values are non-decreasing, never exceed 100, and the last one is exactly 100.
pub struct ProgressSteps {
    rng: StdRng,
    current: f64,
    min_increment: f64,
    max_increment: f64,
    done: bool,
}

impl Iterator for ProgressSteps {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.done {
            return None;
        }
        self.current += self.rng.gen_range(self.min_increment..=self.max_increment);
        if self.current >= 100.0 {
            self.current = 100.0;
            self.done = true;
        }
        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fileedit_core::{FileId, IncomingFile, ProgressSink, TrackedFile};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        ticks: Mutex<Vec<f64>>,
    }

    #[async_trait]
    impl ProgressSink for Recorder {
        async fn on_progress(&self, _file_id: FileId, progress: f64) {
            self.ticks.lock().await.push(progress);
        }
    }

    fn job(name: &str) -> ProcessingJob {
        ProcessingJob::new(&TrackedFile::from_incoming(&IncomingFile::new(name, 10), None), None)
    }

    #[test]
    fn test_steps_are_monotonic_and_end_at_100() {
        for seed in 0..50 {
            let steps: Vec<f64> = SimulatedProcessor::new().with_seed(seed).progress_steps().collect();
            assert!(!steps.is_empty());
            assert!(steps.windows(2).all(|w| w[0] <= w[1]), "seed {seed}: {steps:?}");
            assert!(steps.iter().all(|p| (0.0..=100.0).contains(p)));
            assert_eq!(*steps.last().unwrap(), 100.0);
            assert_eq!(steps.iter().filter(|p| **p == 100.0).count(), 1);
        }
    }

    #[test]
    fn test_seeded_steps_are_reproducible() {
        let sim = SimulatedProcessor::new().with_seed(7);
        let a: Vec<f64> = sim.progress_steps().collect();
        let b: Vec<f64> = sim.progress_steps().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_range_falls_back_to_default() {
        let steps: Vec<f64> = SimulatedProcessor::new()
            .with_increment_range(0.0, 0.0)
            .with_seed(1)
            .progress_steps()
            .collect();
        assert_eq!(*steps.last().unwrap(), 100.0);
    }

    #[test]
    fn test_non_finite_range_falls_back_to_default() {
        let default: Vec<f64> = SimulatedProcessor::new().with_seed(5).progress_steps().collect();
        for (min, max) in [(f64::NAN, 10.0), (0.0, f64::NAN), (1.0, f64::INFINITY)] {
            let steps: Vec<f64> = SimulatedProcessor::new()
                .with_increment_range(min, max)
                .with_seed(5)
                .progress_steps()
                .collect();
            assert_eq!(steps, default, "range ({min}, {max})");
        }
    }

    #[tokio::test]
    async fn test_process_reports_every_step_and_resolves() {
        let sim = SimulatedProcessor::new()
            .with_tick_interval(Duration::from_millis(1))
            .with_increment_range(20.0, 40.0)
            .with_seed(3)
            .with_artifact_base("blob:test");
        let expected: Vec<f64> = sim.progress_steps().collect();

        let recorder = Arc::new(Recorder::default());
        let job = job("report.pdf");
        let reporter = ProgressReporter::new(job.file_id, recorder.clone());

        let artifact = sim.process(&job, &reporter).await.unwrap();
        assert_eq!(artifact.reference, format!("blob:test/{}", job.file_id));
        assert_eq!(*recorder.ticks.lock().await, expected);
    }

    #[tokio::test]
    async fn test_marked_file_fails_midway() {
        let sim = SimulatedProcessor::new()
            .with_tick_interval(Duration::from_millis(1))
            .with_increment_range(10.0, 20.0)
            .with_fail_names(vec!["broken.pdf".into()]);

        let recorder = Arc::new(Recorder::default());
        let job = job("broken.pdf");
        let reporter = ProgressReporter::new(job.file_id, recorder.clone());

        let err = sim.process(&job, &reporter).await.unwrap_err();
        assert_eq!(err, ProcessingError::Failed("simulated failure".into()));
        assert!(recorder.ticks.lock().await.iter().all(|p| *p < SIMULATED_FAILURE_POINT));
    }
}
