//! Herald command-line interface.

pub mod actions;
pub mod collect;
pub mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use herald_core::{HeraldConfig, Reporter};
use std::sync::Arc;

/// Herald - publish Markdown templates to Discord channels
#[derive(Parser)]
#[command(name = "herald")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "HERALD_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Parse the templates and publish them to their channels
    Deliver(commands::deliver::DeliverArgs),

    /// Parse and validate the templates without contacting Discord
    Check(commands::check::CheckArgs),

    /// Show version information
    Version,
}

impl Cli {
    /// Default log filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "herald=info",
            1 => "herald=debug",
            _ => "herald=trace",
        }
    }
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli, reporter: Arc<dyn Reporter>) -> anyhow::Result<()> {
    let config = HeraldConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Deliver(args) => commands::deliver::run(args, &config, reporter).await,
        Commands::Check(args) => commands::check::run(args, &config, reporter.as_ref()).await,
        Commands::Version => {
            println!("herald {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
