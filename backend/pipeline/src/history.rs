//! Activity history: newest-first log of terminated files.

use std::collections::VecDeque;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use fileedit_core::{ActivityId, ActivityOutcome, ActivityRecord};

/// Default retention cap.
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// Ordered, filterable log of past operations.
///
/// Appends serialize on the internal lock; readers get snapshots.
#[derive(Debug)]
pub struct ActivityLog {
    entries: RwLock<VecDeque<ActivityRecord>>,
    max_entries: Option<usize>,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityLog {
    /// Unbounded log.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            max_entries: None,
        }
    }

    /// Log that evicts its oldest entries beyond `max_entries`.
    /// A limit of zero leaves the log unbounded.
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            max_entries: (max_entries > 0).then_some(max_entries),
        }
    }

    /// Seed the log; `entries` must already be newest-first.
    pub fn with_entries(mut self, entries: Vec<ActivityRecord>) -> Self {
        let mut seeded: VecDeque<ActivityRecord> = entries.into();
        if let Some(max) = self.max_entries {
            seeded.truncate(max);
        }
        self.entries = RwLock::new(seeded);
        self
    }

    /// Prepend an entry.
    pub async fn record(&self, entry: ActivityRecord) {
        let mut entries = self.entries.write().await;
        debug!(activity_id = %entry.id, file = %entry.file_name, status = %entry.status, "Recording activity");
        entries.push_front(entry);
        if let Some(max) = self.max_entries {
            while entries.len() > max {
                if let Some(evicted) = entries.pop_back() {
                    debug!(activity_id = %evicted.id, "Evicted activity beyond retention cap");
                }
            }
        }
    }

    /// Entries whose file name or action contains `filter`, case-insensitively.
    /// An absent or empty filter returns the whole log.
    pub async fn query(&self, filter: Option<&str>) -> Vec<ActivityRecord> {
        let entries = self.entries.read().await;
        match filter.filter(|f| !f.is_empty()) {
            None => entries.iter().cloned().collect(),
            Some(filter) => {
                let needle = filter.to_lowercase();
                entries.iter().filter(|e| e.matches(&needle)).cloned().collect()
            }
        }
    }

    pub async fn entries(&self) -> Vec<ActivityRecord> {
        self.query(None).await
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// The two sample entries shown on a fresh dashboard.
    pub fn sample_entries() -> Vec<ActivityRecord> {
        let now = Utc::now();
        vec![
            ActivityRecord {
                id: ActivityId::new(),
                file_name: "Q4_Financial_Report.pdf".into(),
                file_type: "pdf".into(),
                action: "Compressed".into(),
                date: "2 hours ago".into(),
                recorded_at: now - Duration::hours(2),
                status: ActivityOutcome::Completed,
                download_url: Some("#".into()),
                failure: None,
            },
            ActivityRecord {
                id: ActivityId::new(),
                file_name: "Contract_Draft_v2.docx".into(),
                file_type: "docx".into(),
                action: "PDF Convert".into(),
                date: "Yesterday".into(),
                recorded_at: now - Duration::days(1),
                status: ActivityOutcome::Completed,
                download_url: Some("#".into()),
                failure: None,
            },
        ]
    }
}
