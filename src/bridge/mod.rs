// Bridge module - Subprocess access to the Android device bridge

mod runner;
#[cfg(test)]
pub(crate) mod scripted;

pub use runner::AdbBridge;

use crate::error::Result;
use std::time::Duration;

/// Outcome of a single device bridge invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code, `None` when the process was killed or timed out
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Whether the call was abandoned after its timeout elapsed
    pub timed_out: bool,
}

impl CommandResult {
    /// Result of a call that finished with the given exit code
    #[cfg(test)]
    pub(crate) fn exited(exit_code: i32, stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: String::new(),
            timed_out: false,
        }
    }

    /// Result of a call that was abandoned after its timeout
    pub fn timeout() -> Self {
        Self {
            timed_out: true,
            ..Self::default()
        }
    }

    /// Exited with status 0 before the timeout
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Successful and produced non-whitespace output
    pub fn has_content(&self) -> bool {
        self.success() && !self.stdout.trim().is_empty()
    }

    /// Non-empty stdout lines with surrounding whitespace removed
    pub fn stdout_lines(&self) -> impl Iterator<Item = &str> {
        self.stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// Short human-readable reason for a failed call
    pub fn failure_reason(&self) -> String {
        if self.timed_out {
            return "timed out".to_string();
        }
        let stderr = self.stderr.trim();
        match (self.exit_code, stderr.is_empty()) {
            (Some(code), true) => format!("exited with status {}", code),
            (Some(code), false) => format!("exited with status {}: {}", code, stderr),
            (None, true) => "terminated by signal".to_string(),
            (None, false) => format!("terminated by signal: {}", stderr),
        }
    }
}

/// Something that can run device bridge subcommands
///
/// `AdbBridge` runs the real executable; tests substitute a scripted one.
#[allow(async_fn_in_trait)]
pub trait DeviceBridge {
    /// Run the bridge with `args`, giving up after `timeout`
    ///
    /// A timeout is reported through `CommandResult::timed_out`, not as an
    /// error. Errors mean the bridge could not be started at all.
    async fn run(&self, args: &[&str], timeout: Duration) -> Result<CommandResult>;
}
