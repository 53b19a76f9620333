// Report module - Print and save output modes

use crate::error::{LogpullError, Result};
use crate::fetch::{LogStats, RetrievedLog};
use chrono::NaiveDateTime;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Message used when neither a crash report nor a log was found
pub const NOTHING_FOUND: &str = "No log files found";

/// Timestamp format used in capture file names
pub const CAPTURE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Give up looking for a free file name after this many collisions
const MAX_NAME_COLLISIONS: usize = 1000;

fn rule() -> String {
    "=".repeat(50)
}

fn push_section(lines: &mut Vec<String>, title: &str) {
    lines.push(rule());
    lines.push(title.to_string());
    lines.push(rule());
}

/// Format stats the way both output modes report them
pub fn format_stats(stats: &LogStats) -> String {
    format!("{} error(s), {} warning(s)", stats.errors, stats.warnings)
}

/// Render everything that was retrieved as one block of text
pub fn render_print(retrieved: &RetrievedLog) -> String {
    let mut lines = Vec::new();

    if let Some(crash) = retrieved.crash_text() {
        push_section(&mut lines, "Crash Report");
        lines.push(crash.to_string());
        lines.push(String::new());
    }

    if let Some(log) = retrieved.log_text() {
        push_section(&mut lines, "App Log");
        lines.push(log.to_string());
        lines.push(String::new());

        let stats = LogStats::from_text(log);
        lines.push(rule());
        lines.push(format!("Stats: {}", format_stats(&stats)));
        lines.push(rule());
    }

    if lines.is_empty() {
        return NOTHING_FOUND.to_string();
    }

    lines.join("\n")
}

/// Files written by one save-mode run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedCapture {
    pub crash_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub stats: Option<LogStats>,
}

impl SavedCapture {
    pub fn is_empty(&self) -> bool {
        self.crash_file.is_none() && self.log_file.is_none()
    }
}

/// Write the retrieved items into `dir` as timestamped text files
///
/// The directory is created if needed. Existing captures are never
/// overwritten: a clashing name gets a numeric suffix instead.
pub async fn save_capture(
    retrieved: &RetrievedLog,
    dir: &Path,
    captured_at: NaiveDateTime,
) -> Result<SavedCapture> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        LogpullError::OutputError(format!(
            "Failed to create output directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let timestamp = captured_at.format(CAPTURE_TIMESTAMP_FORMAT).to_string();
    let mut saved = SavedCapture::default();

    if let Some(crash) = retrieved.crash_text() {
        let stem = format!("crash_report_{}", timestamp);
        saved.crash_file = Some(write_new_file(dir, &stem, crash).await?);
    }

    if let Some(log) = retrieved.log_text() {
        let stem = format!("app_log_{}", timestamp);
        saved.log_file = Some(write_new_file(dir, &stem, log).await?);
        saved.stats = Some(LogStats::from_text(log));
    }

    Ok(saved)
}

/// Create `<stem>.txt` (or `<stem>_<n>.txt`) in `dir` without clobbering
async fn write_new_file(dir: &Path, stem: &str, content: &str) -> Result<PathBuf> {
    for attempt in 0..MAX_NAME_COLLISIONS {
        let name = if attempt == 0 {
            format!("{}.txt", stem)
        } else {
            format!("{}_{}.txt", stem, attempt)
        };
        let path = dir.join(name);

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(LogpullError::OutputError(format!(
                    "Failed to create {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "Capture written");
        return Ok(path);
    }

    Err(LogpullError::OutputError(format!(
        "No free file name for {} in {}",
        stem,
        dir.display()
    )))
}
