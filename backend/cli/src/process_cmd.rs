//! CLI Process Command
//!
//! Reads files from disk, runs them through the pipeline and prints live
//! progress, then the activity history and plan usage.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use fileedit_config::FileEditConfig;
use fileedit_core::{
    format_file_size, relative_time_label, ActivityOutcome, ActivityRecord, FileEditError, FileId, FileStatus,
    IncomingFile, PipelineEvent, TrackedFile, UserPlan,
};
use fileedit_logging::redact_sensitive_data;
use fileedit_pipeline::AppState;

use crate::terminal_output::{
    note_error, note_info, note_success, note_warn, paint, progress_bar, render_table, Column,
    BOLD, DIM, GREEN, RED,
};

pub struct ProcessArgs<'a> {
    pub paths: &'a [PathBuf],
    pub tool: Option<&'a str>,
    pub query: Option<&'a str>,
    pub seed_history: bool,
}

pub async fn run(config: &FileEditConfig, args: ProcessArgs<'_>) -> Result<()> {
    let state = crate::config::app_state(config, args.seed_history);

    let batch = intake(args.paths, state.needs_content(args.tool), state.max_file_bytes()).await?;

    // Subscribe before uploading so no registration is missed.
    let events = state.orchestrator().subscribe();

    let files = match state.upload(Some(batch), args.tool).await {
        Ok(files) => files,
        Err(FileEditError::FileTooLarge { max_bytes, offending }) => {
            for name in &offending {
                note_error(&format!("{name} exceeds {}", format_file_size(max_bytes)));
            }
            bail!(FileEditError::FileTooLarge { max_bytes, offending });
        }
        Err(e) => return Err(e.into()),
    };

    if files.is_empty() {
        note_warn("Nothing to process");
    } else {
        note_info(&format!(
            "Processing {} file(s) with {}",
            files.len(),
            args.tool.unwrap_or("the general pipeline")
        ));
        follow(&state, &files, events).await;
        state.orchestrator().wait_all().await;
        print_results(&state.orchestrator().files().await);
    }

    print_history(&state.activities(args.query).await, args.query);
    print_plan(state.plan());
    Ok(())
}

/// Build the intake batch. Bytes are only read when the processor needs
/// them and the file fits under the ceiling.
async fn intake(paths: &[PathBuf], needs_content: bool, max_bytes: u64) -> Result<Vec<IncomingFile>> {
    let mut batch = Vec::with_capacity(paths.len());
    for path in paths {
        let meta = fs::metadata(path)
            .await
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        if !meta.is_file() {
            bail!("{} is not a regular file", path.display());
        }

        let name = file_name(path)?;
        let mut incoming = IncomingFile::new(name, meta.len());
        if needs_content && meta.len() <= max_bytes {
            let bytes = fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            incoming.content = Some(bytes.into());
        }
        debug!(file = %incoming.name, size = incoming.size, loaded = incoming.content.is_some(), "Intake");
        batch.push(incoming);
    }
    Ok(batch)
}

pub(crate) fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} has no file name", path.display()))
}

/// Print progress until every submitted file is terminal. Ctrl-C cancels
/// whatever is still running.
async fn follow(
    state: &AppState,
    files: &[TrackedFile],
    events: tokio::sync::broadcast::Receiver<PipelineEvent>,
) {
    let names: HashMap<FileId, String> = files.iter().map(|f| (f.id, f.name.clone())).collect();
    let width = names.values().map(|n| n.chars().count()).max().unwrap_or(0);
    let mut remaining: HashSet<FileId> = files.iter().map(|f| f.id).collect();

    let mut events = BroadcastStream::new(events);
    let mut ctrl_c = std::pin::pin!(tokio::signal::ctrl_c());
    let mut cancelling = false;

    while !remaining.is_empty() {
        tokio::select! {
            next = events.next() => match next {
                Some(Ok(PipelineEvent::Progress { file_id, progress, .. })) => {
                    if let Some(name) = names.get(&file_id) {
                        println!("  {name:<width$}  {}", progress_bar(progress));
                    }
                }
                Some(Ok(PipelineEvent::Finalized { file_id, status, artifact, text, failure })) => {
                    if !remaining.remove(&file_id) {
                        continue;
                    }
                    let name = names.get(&file_id).map(String::as_str).unwrap_or("?");
                    match status {
                        FileStatus::Completed => {
                            note_success(&format!(
                                "{name} ready at {}",
                                artifact.as_deref().unwrap_or("-")
                            ));
                            if let Some(text) = text {
                                println!("{}\n{text}", paint("  Extracted text:", DIM));
                            }
                        }
                        _ => note_error(&format!(
                            "{name} failed: {}",
                            redact_sensitive_data(failure.as_deref().unwrap_or("unknown error"))
                        )),
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    warn!(skipped, "Event stream lagged; resynchronising");
                    let snapshot = state.orchestrator().files().await;
                    remaining.retain(|id| snapshot.iter().any(|f| f.id == *id && !f.is_terminal()));
                }
                None => break,
            },
            _ = &mut ctrl_c, if !cancelling => {
                cancelling = true;
                note_warn("Interrupted; cancelling remaining files");
                for id in &remaining {
                    state.orchestrator().cancel(*id).await;
                }
            }
        }
    }
}

fn status_cell(status: FileStatus) -> String {
    match status {
        FileStatus::Completed => paint("completed", GREEN),
        FileStatus::Failed => paint("failed", RED),
        other => other.to_string(),
    }
}

fn print_results(files: &[TrackedFile]) {
    let rows: Vec<Vec<String>> = files
        .iter()
        .map(|f| {
            vec![
                f.name.clone(),
                format_file_size(f.size),
                status_cell(f.status),
                f.artifact
                    .clone()
                    .or_else(|| f.failure.as_deref().map(redact_sensitive_data))
                    .unwrap_or_default(),
            ]
        })
        .collect();
    println!("\n{}\n", paint("Files", BOLD));
    print!(
        "{}",
        render_table(
            &[
                Column::left("File"),
                Column::right("Size"),
                Column::left("Status"),
                Column::left("Result"),
            ],
            &rows,
        )
    );
}

fn print_history(history: &[ActivityRecord], query: Option<&str>) {
    let title = match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("Recent activity matching \"{q}\""),
        None => "Recent activity".to_string(),
    };
    println!("\n{}\n", paint(&title, BOLD));
    if history.is_empty() {
        println!("  {}", paint("No activity yet", DIM));
        return;
    }
    let now = Utc::now();
    let rows: Vec<Vec<String>> = history
        .iter()
        .map(|a| {
            let status = match a.status {
                ActivityOutcome::Completed => paint("Completed", GREEN),
                ActivityOutcome::Failed => paint("Failed", RED),
            };
            vec![a.file_name.clone(), a.action.clone(), date_label(a, now), status]
        })
        .collect();
    print!(
        "{}",
        render_table(
            &[
                Column::left("File"),
                Column::left("Action"),
                Column::left("Date"),
                Column::left("Status"),
            ],
            &rows,
        )
    );
}

/// Date column relative to `now`; stored labels go stale once printed later.
fn date_label(record: &ActivityRecord, now: DateTime<Utc>) -> String {
    relative_time_label(record.recorded_at, now)
}

fn print_plan(plan: &UserPlan) {
    let pct = plan.usage_percent();
    println!(
        "\n{}  {} of {} GB used {}\n",
        paint(&plan.name, BOLD),
        plan.used_gb,
        plan.limit_gb,
        progress_bar(f64::from(pct))
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn intake_loads_bytes_only_when_needed() {
        let path = std::env::temp_dir().join(format!("fileedit-intake-{}.txt", std::process::id()));
        fs::write(&path, b"hello").await.unwrap();

        let light = intake(std::slice::from_ref(&path), false, 1024).await.unwrap();
        assert_eq!(light[0].size, 5);
        assert!(light[0].content.is_none());

        let loaded = intake(std::slice::from_ref(&path), true, 1024).await.unwrap();
        assert_eq!(loaded[0].content.as_deref(), Some(&b"hello"[..]));

        let oversized = intake(std::slice::from_ref(&path), true, 2).await.unwrap();
        assert!(oversized[0].content.is_none());

        fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn intake_rejects_missing_paths() {
        let missing = PathBuf::from("/definitely/not/here.pdf");
        assert!(intake(&[missing], false, 1024).await.is_err());
    }

    #[test]
    fn history_dates_are_relative_to_now() {
        let samples = fileedit_pipeline::ActivityLog::sample_entries();
        let now = Utc::now();
        let labels: Vec<String> = samples
            .iter()
            .map(|a| date_label(a, now))
            .collect();
        assert_eq!(labels, vec!["2 hours ago", "Yesterday"]);
    }

    #[test]
    fn file_name_uses_last_component() {
        assert_eq!(file_name(Path::new("/tmp/a/Report.PDF")).unwrap(), "Report.PDF");
        assert!(file_name(Path::new("/")).is_err());
    }
}
