use anyhow::Context;
use clap::Parser;
use logpull::cli::{output, Cli};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logpull::logging::init_logging(cli.verbose());

    match run(&cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::from(1)
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<u8> {
    let config = cli.load_config().context("Invalid configuration")?;
    let status = cli
        .execute(&config)
        .await
        .context("Failed to pull logs")?;
    Ok(status.exit_code())
}
