use super::{read_private_file, FetchOutcome};
use crate::bridge::DeviceBridge;
use crate::config::PullConfig;

/// Fetch the crash report the app leaves in its private storage
///
/// A missing or blank report is `Absent`; only bridge failures are `Failed`.
pub async fn fetch_crash_report<B: DeviceBridge>(
    bridge: &B,
    config: &PullConfig,
) -> FetchOutcome {
    read_private_file(bridge, config, &config.crash_report_path)
        .await
        .into()
}
