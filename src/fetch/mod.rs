// Fetch module - Reading crash reports and log files from app-private storage

mod crash;
mod log_file;

pub use crash::fetch_crash_report;
pub use log_file::{fetch_latest_log, list_log_files};

use crate::bridge::DeviceBridge;
use crate::config::PullConfig;
use crate::error::{LogpullError, Result};
use chrono::NaiveDate;

/// Result of fetching one item from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The item exists and has non-whitespace content
    Found(String),
    /// The item does not exist or is empty
    Absent,
    /// The bridge could not complete the request
    Failed(String),
}

impl FetchOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            FetchOutcome::Found(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FetchOutcome::Found(_))
    }
}

impl From<Result<Option<String>>> for FetchOutcome {
    fn from(result: Result<Option<String>>) -> Self {
        match result {
            Ok(Some(text)) => FetchOutcome::Found(text),
            Ok(None) => FetchOutcome::Absent,
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }
}

/// Occurrences of the app's severity markers in a log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogStats {
    pub errors: usize,
    pub warnings: usize,
}

impl LogStats {
    /// Count literal `[ERROR]` and `[WARN]` markers
    pub fn from_text(text: &str) -> Self {
        Self {
            errors: text.matches("[ERROR]").count(),
            warnings: text.matches("[WARN]").count(),
        }
    }
}

/// Everything pulled from the device in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedLog {
    crash: FetchOutcome,
    log: FetchOutcome,
}

impl RetrievedLog {
    pub fn new(crash: FetchOutcome, log: FetchOutcome) -> Self {
        Self { crash, log }
    }

    pub fn crash(&self) -> &FetchOutcome {
        &self.crash
    }

    pub fn log(&self) -> &FetchOutcome {
        &self.log
    }

    pub fn crash_text(&self) -> Option<&str> {
        self.crash.text()
    }

    pub fn log_text(&self) -> Option<&str> {
        self.log.text()
    }

    /// Severity counts, when a log was found
    pub fn stats(&self) -> Option<LogStats> {
        self.log_text().map(LogStats::from_text)
    }

    pub fn is_empty(&self) -> bool {
        !self.crash.is_found() && !self.log.is_found()
    }
}

/// Fetch the crash report and the most recent log
///
/// Failed fetches are reported on stderr and otherwise treated as absent.
pub async fn retrieve<B: DeviceBridge>(
    bridge: &B,
    config: &PullConfig,
    today: NaiveDate,
) -> RetrievedLog {
    let crash = fetch_crash_report(bridge, config).await;
    if let FetchOutcome::Failed(ref reason) = crash {
        tracing::warn!(%reason, "Failed to fetch crash report");
    }

    let log = fetch_latest_log(bridge, config, today).await;
    if let FetchOutcome::Failed(ref reason) = log {
        tracing::warn!(%reason, "Failed to fetch log content");
    }

    RetrievedLog::new(crash, log)
}

/// `cat` a file inside the app-private storage
///
/// # Returns
/// * `Ok(Some(text))` - The file has non-whitespace content
/// * `Ok(None)` - The file is missing, unreadable or blank
/// * `Err(LogpullError)` - The bridge failed to start or timed out
pub(crate) async fn read_private_file<B: DeviceBridge>(
    bridge: &B,
    config: &PullConfig,
    path: &str,
) -> Result<Option<String>> {
    let args = ["shell", "run-as", config.package.as_str(), "cat", path];
    let result = bridge.run(&args, config.fetch_timeout()).await?;

    if result.timed_out {
        return Err(LogpullError::BridgeTimeout(format!("cat {}", path)));
    }

    if result.has_content() {
        Ok(Some(result.stdout))
    } else {
        tracing::debug!(%path, reason = %result.failure_reason(), "No content");
        Ok(None)
    }
}
