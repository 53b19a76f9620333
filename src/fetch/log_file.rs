use super::{read_private_file, FetchOutcome};
use crate::bridge::DeviceBridge;
use crate::config::PullConfig;
use crate::error::{LogpullError, Result};
use chrono::NaiveDate;

/// List the app's log files in its private log directory
///
/// With `sorted`, the bridge is asked for `ls -t` so the most recently
/// modified file comes first. A missing directory yields an empty list.
pub async fn list_log_files<B: DeviceBridge>(
    bridge: &B,
    config: &PullConfig,
    sorted: bool,
) -> Result<Vec<String>> {
    let mut args = vec!["shell", "run-as", config.package.as_str(), "ls"];
    if sorted {
        args.push("-t");
    }
    args.push(config.remote_log_dir.as_str());

    let result = bridge.run(&args, config.fetch_timeout()).await?;

    if result.timed_out {
        return Err(LogpullError::BridgeTimeout(format!(
            "ls {}",
            config.remote_log_dir
        )));
    }

    if !result.success() {
        tracing::debug!(
            dir = %config.remote_log_dir,
            reason = %result.failure_reason(),
            "Log directory not listed"
        );
        return Ok(Vec::new());
    }

    Ok(result
        .stdout_lines()
        .filter(|name| config.is_log_file_name(name))
        .map(str::to_string)
        .collect())
}

/// Fetch the content of the most relevant log file
///
/// Today's file is tried first; otherwise the newest file reported by the
/// bridge is read. Only one file's content is ever returned.
pub async fn fetch_latest_log<B: DeviceBridge>(
    bridge: &B,
    config: &PullConfig,
    today: NaiveDate,
) -> FetchOutcome {
    resolve_latest_log(bridge, config, today).await.into()
}

async fn resolve_latest_log<B: DeviceBridge>(
    bridge: &B,
    config: &PullConfig,
    today: NaiveDate,
) -> Result<Option<String>> {
    let todays_file = config.log_file_for_day(&today.format("%Y-%m-%d").to_string());
    if let Some(content) = read_private_file(bridge, config, &todays_file).await? {
        tracing::info!(file = %todays_file, "Using today's log file");
        return Ok(Some(content));
    }

    if list_log_files(bridge, config, false).await?.is_empty() {
        tracing::debug!(dir = %config.remote_log_dir, "No log files on device");
        return Ok(None);
    }

    let newest = match list_log_files(bridge, config, true).await?.into_iter().next() {
        Some(name) => name,
        None => return Ok(None),
    };

    let path = config.remote_log_path(&newest);
    tracing::info!(file = %path, "No log for today, using most recent log file");
    read_private_file(bridge, config, &path).await
}
