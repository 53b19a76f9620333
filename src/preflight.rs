// Preflight checks - readiness probes run before any log is fetched

use crate::bridge::{CommandResult, DeviceBridge};
use crate::config::PullConfig;
use thiserror::Error;

/// The first readiness probe that did not pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreflightFailure {
    #[error("ADB tool not found")]
    ToolUnavailable,

    #[error("No connected Android device detected")]
    DeviceNotConnected,

    #[error("Application {0} is not installed on the device")]
    AppNotInstalled(String),
}

impl PreflightFailure {
    /// What the user can do about it
    pub fn remediation(&self) -> &'static str {
        match self {
            PreflightFailure::ToolUnavailable => {
                "Install the Android SDK Platform Tools and make sure `adb` is on your PATH"
            }
            PreflightFailure::DeviceNotConnected => {
                "Connect the device over USB and enable USB debugging"
            }
            PreflightFailure::AppNotInstalled(_) => {
                "Install a debuggable build of the application on the device"
            }
        }
    }
}

/// One line of `adb devices` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    pub serial: String,
    pub state: String,
}

/// Parse the listing printed by `adb devices`
pub fn parse_devices(output: &str) -> Vec<DeviceEntry> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("List of devices") && !line.starts_with('*'))
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let serial = columns.next()?;
            let state = columns.next()?;
            Some(DeviceEntry {
                serial: serial.to_string(),
                state: state.to_string(),
            })
        })
        .collect()
}

/// Whether `pm list packages` output names exactly `package`
pub fn package_listed(output: &str, package: &str) -> bool {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("package:"))
        .any(|name| name.trim() == package)
}

/// Run the bridge for a probe, folding errors and timeouts into `None`
async fn probe<B: DeviceBridge>(
    bridge: &B,
    config: &PullConfig,
    args: &[&str],
) -> Option<CommandResult> {
    match bridge.run(args, config.probe_timeout()).await {
        Ok(result) if result.success() => Some(result),
        Ok(result) => {
            tracing::debug!(?args, reason = %result.failure_reason(), "Probe did not pass");
            None
        }
        Err(e) => {
            tracing::debug!(?args, error = %e, "Probe could not run");
            None
        }
    }
}

/// Check that the device bridge executable runs
pub async fn check_tool<B: DeviceBridge>(bridge: &B, config: &PullConfig) -> bool {
    probe(bridge, config, &["version"]).await.is_some()
}

/// Check that at least one device is attached and authorized
pub async fn check_device<B: DeviceBridge>(bridge: &B, config: &PullConfig) -> bool {
    match probe(bridge, config, &["devices"]).await {
        Some(result) => {
            let devices = parse_devices(&result.stdout);
            for device in &devices {
                tracing::debug!(serial = %device.serial, state = %device.state, "Found device");
            }
            devices.iter().any(|device| device.state == "device")
        }
        None => false,
    }
}

/// Check that the target application is installed
pub async fn check_app_installed<B: DeviceBridge>(bridge: &B, config: &PullConfig) -> bool {
    let args = ["shell", "pm", "list", "packages", config.package.as_str()];
    match probe(bridge, config, &args).await {
        Some(result) => package_listed(&result.stdout, &config.package),
        None => false,
    }
}

/// Run all probes in order, stopping at the first one that fails
pub async fn run_preflight<B: DeviceBridge>(
    bridge: &B,
    config: &PullConfig,
) -> std::result::Result<(), PreflightFailure> {
    if !check_tool(bridge, config).await {
        return Err(PreflightFailure::ToolUnavailable);
    }
    if !check_device(bridge, config).await {
        return Err(PreflightFailure::DeviceNotConnected);
    }
    if !check_app_installed(bridge, config).await {
        return Err(PreflightFailure::AppNotInstalled(config.package.clone()));
    }

    tracing::info!(package = %config.package, "Preflight checks passed");
    Ok(())
}
