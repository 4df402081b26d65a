use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

mod cli;
mod commands;
mod navigator;
mod output;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("kingyo error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = kingyo_config::KingyoConfig::load_with_dotenv()
        .context("failed to load kingyo configuration")?;
    let flags = cli.global_flags(&config.general.default_format)?;
    ui::init(&flags);

    let navigator = Arc::new(navigator::LoginHint::new(flags.quiet));
    let client = kingyo_client::Kingyo::connect(&config, navigator)
        .context("failed to initialize kingyo client")?;
    tracing::debug!(api_root = %config.api.api_root(), "client ready");

    commands::dispatch::dispatch(cli.command, &client, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("KINGYO_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
