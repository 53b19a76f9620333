use super::{CommandResult, DeviceBridge};
use crate::error::{LogpullError, Result};
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Device bridge backed by the `adb` executable
#[derive(Debug, Clone)]
pub struct AdbBridge {
    /// Executable name or path
    program: String,
}

impl AdbBridge {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for AdbBridge {
    fn default() -> Self {
        Self::new("adb")
    }
}

impl DeviceBridge for AdbBridge {
    /// Run the bridge executable and collect its output
    ///
    /// The child is spawned with piped stdout/stderr and `kill_on_drop`, so
    /// abandoning the wait after `timeout` also terminates it.
    ///
    /// # Returns
    /// * `Ok(CommandResult)` - The call finished or timed out
    /// * `Err(LogpullError)` - The executable could not be started
    async fn run(&self, args: &[&str], timeout: Duration) -> Result<CommandResult> {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let started = Instant::now();
        let child = command.spawn().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                LogpullError::BridgeNotFound(self.program.clone())
            } else {
                LogpullError::BridgeSpawn {
                    program: self.program.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let result = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => CommandResult {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                timed_out: false,
            },
            Ok(Err(e)) => {
                return Err(LogpullError::BridgeSpawn {
                    program: self.program.clone(),
                    reason: format!("failed to collect output: {}", e),
                })
            }
            Err(_) => {
                tracing::warn!(
                    program = %self.program,
                    ?args,
                    timeout_secs = timeout.as_secs(),
                    "Device bridge call timed out"
                );
                CommandResult::timeout()
            }
        };

        tracing::debug!(
            program = %self.program,
            ?args,
            exit_code = ?result.exit_code,
            stdout_bytes = result.stdout.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Device bridge call finished"
        );

        Ok(result)
    }
}
