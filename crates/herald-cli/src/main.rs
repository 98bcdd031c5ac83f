//! Herald CLI entry point.

use clap::Parser;
use herald_cli::{actions, run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_env("HERALD_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| cli.log_filter().into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let reporter = actions::reporter();

    if let Err(e) = run(cli, reporter.clone()).await {
        reporter.error(&format!("{:#}", e), None);
        std::process::exit(1);
    }
}
