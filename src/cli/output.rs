// Output formatting and display for CLI

use crate::config::PullConfig;
use crate::preflight::PreflightFailure;
use crate::report::{format_stats, SavedCapture};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Print an error message to stderr
pub fn print_error(error: &str) {
    eprintln!("{} {}", "✗ Error:".red().bold(), error);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a success message
pub fn print_success_msg(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print the heading shown at the start of save and list modes
pub fn print_banner(title: &str) {
    let rule = "=".repeat(50);
    println!("{}", rule);
    println!("{}", title.bold());
    println!("{}", rule);
    println!();
}

/// Print a failed readiness probe with what to do about it
pub fn print_preflight_failure(failure: &PreflightFailure) {
    print_error(&failure.to_string());
    eprintln!("  {} {}", "→".yellow(), failure.remediation());
}

/// Print the per-file confirmations of a save-mode run
pub fn print_saved(saved: &SavedCapture) {
    match saved.crash_file {
        Some(ref path) => print_success_msg(&format!("Crash report saved: {}", display(path))),
        None => print_info("No crash report"),
    }

    match saved.log_file {
        Some(ref path) => {
            print_success_msg(&format!("App log saved: {}", display(path)));
            if let Some(ref stats) = saved.stats {
                println!("  {}: {}", "Log stats".bold(), format_stats(stats));
            }
        }
        None => print_info("No log file found"),
    }
}

/// Print the device's log files as a table, most recent first
pub fn print_log_files(files: &[String], config: &PullConfig) {
    #[derive(Tabled)]
    struct LogFileRow {
        #[tabled(rename = "#")]
        rank: usize,
        #[tabled(rename = "File")]
        name: String,
        #[tabled(rename = "Remote Path")]
        path: String,
    }

    if files.is_empty() {
        println!("{}", "No log files on the device".yellow());
        return;
    }

    let rows: Vec<LogFileRow> = files
        .iter()
        .enumerate()
        .map(|(i, name)| LogFileRow {
            rank: i + 1,
            name: name.clone(),
            path: config.remote_log_path(name),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    println!("{}\n", table);
    println!(
        "{}",
        format!("Total: {} log file(s)", files.len())
            .dimmed()
            .italic()
    );
}

fn display(path: &Path) -> String {
    path.display().to_string().cyan().to_string()
}

/// Create a spinner on stderr for device round-trips
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(
            style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
