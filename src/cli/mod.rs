// CLI module - User-facing command-line interface

pub mod output;

use crate::bridge::AdbBridge;
use crate::config::PullConfig;
use crate::error::Result;
use crate::fetch::{list_log_files, retrieve};
use crate::preflight::run_preflight;
use crate::report::{render_print, save_capture};
use chrono::Local;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

/// logpull - Pull application logs and crash reports from an Android device
#[derive(Parser, Debug)]
#[command(name = "logpull")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Save the logs into the local workspace instead of printing them
    #[arg(long, conflicts_with = "list")]
    save: bool,

    /// List the log files on the device, most recent first
    #[arg(long)]
    list: bool,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Package name of the target application
    #[arg(short, long)]
    package: Option<String>,

    /// Path to the adb executable
    #[arg(long)]
    adb: Option<String>,

    /// Directory for saved captures
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// What the user asked the tool to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Print,
    Save,
    List,
}

/// How a run ended when no hard error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    PreflightFailed,
}

impl RunStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::PreflightFailed => 1,
        }
    }
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.save {
            Mode::Save
        } else if self.list {
            Mode::List
        } else {
            Mode::Print
        }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Build the effective configuration: file (or defaults), then flags
    pub fn load_config(&self) -> Result<PullConfig> {
        let mut config = match self.config {
            Some(ref path) => PullConfig::from_file(path)?,
            None => PullConfig::default(),
        };

        if let Some(ref package) = self.package {
            config.package = package.clone();
        }
        if let Some(ref adb) = self.adb {
            config.adb_program = adb.clone();
        }
        if let Some(ref dir) = self.output_dir {
            config.output_dir = Some(dir.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Execute the selected mode against the configured device bridge
    pub async fn execute(&self, config: &PullConfig) -> Result<RunStatus> {
        let bridge = AdbBridge::new(config.adb_program.clone());
        let mode = self.mode();
        tracing::debug!(?mode, adb = %bridge.program(), package = %config.package, "Starting");

        match mode {
            Mode::Print => print_mode(&bridge, config).await,
            Mode::Save => save_mode(&bridge, config).await,
            Mode::List => list_mode(&bridge, config).await,
        }
    }
}

async fn print_mode(bridge: &AdbBridge, config: &PullConfig) -> Result<RunStatus> {
    if let Err(failure) = run_preflight(bridge, config).await {
        output::print_preflight_failure(&failure);
        eprintln!("Use --save to store the logs in the workspace once the device is ready");
        return Ok(RunStatus::PreflightFailed);
    }

    let today = Local::now().date_naive();
    let retrieved = retrieve(bridge, config, today).await;

    // stdout may already be closed, e.g. when piped into `head`
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", render_print(&retrieved)) {
        tracing::debug!(error = %e, "Stdout closed before the logs were written");
    }
    Ok(RunStatus::Completed)
}

async fn save_mode(bridge: &AdbBridge, config: &PullConfig) -> Result<RunStatus> {
    output::print_banner(&format!("logpull - save mode ({})", config.package));

    if let Err(failure) = run_preflight(bridge, config).await {
        output::print_preflight_failure(&failure);
        return Ok(RunStatus::PreflightFailed);
    }

    output::print_success_msg("Device connected");
    output::print_success_msg("App installed");
    println!();

    // One timestamp per run, shared by every file of the capture
    let captured_at = Local::now().naive_local();
    let out_dir = config.resolve_output_dir()?;

    let spinner = output::create_spinner("Fetching logs from device...");
    let retrieved = retrieve(bridge, config, captured_at.date()).await;
    spinner.finish_and_clear();

    let saved = save_capture(&retrieved, &out_dir, captured_at).await?;
    output::print_saved(&saved);

    tracing::info!(
        dir = %out_dir.display(),
        crash = saved.crash_file.is_some(),
        log = saved.log_file.is_some(),
        "Capture finished"
    );
    Ok(RunStatus::Completed)
}

async fn list_mode(bridge: &AdbBridge, config: &PullConfig) -> Result<RunStatus> {
    output::print_banner(&format!("logpull - log files ({})", config.package));

    if let Err(failure) = run_preflight(bridge, config).await {
        output::print_preflight_failure(&failure);
        return Ok(RunStatus::PreflightFailed);
    }

    let spinner = output::create_spinner("Listing log files...");
    let files = list_log_files(bridge, config, true).await;
    spinner.finish_and_clear();

    output::print_log_files(&files?, config);
    Ok(RunStatus::Completed)
}
