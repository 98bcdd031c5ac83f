//! Template delivery.

use super::fail;
use crate::collect::collect;
use clap::Args;
use herald_core::{BotToken, HeraldConfig, Reporter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Deliver command arguments.
#[derive(Args)]
pub struct DeliverArgs {
    /// Directory containing the templates
    #[arg(long, env = "INPUT_CONTENT")]
    pub content: PathBuf,

    /// Discord bot token (falls back to DISCORD_TOKEN)
    #[arg(long, env = "INPUT_DISCORD-TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl DeliverArgs {
    /// The bot token from the flag or the environment.
    pub fn token(&self) -> Option<BotToken> {
        self.token
            .clone()
            .or_else(|| std::env::var("DISCORD_TOKEN").ok())
            .map(BotToken::new)
            .filter(|token| !token.is_empty())
    }
}

/// Run the deliver command.
pub async fn run(
    args: DeliverArgs,
    config: &HeraldConfig,
    reporter: Arc<dyn Reporter>,
) -> anyhow::Result<()> {
    reporter.start_group("Parse Step");
    let collected = collect(&args.content, &config.templates.extension, reporter.as_ref()).await;
    reporter.end_group();
    let data = collected.map_err(|e| fail(reporter.as_ref(), e))?;

    if data.is_empty() {
        return Ok(());
    }

    let Some(token) = args.token() else {
        anyhow::bail!("Input 'discord-token' is required");
    };

    reporter.start_group("Send Step");
    let delivered =
        herald_channels::deliver(&token, &data, &config.delivery, reporter.clone()).await;
    reporter.end_group();
    let summary = delivered.map_err(|e| fail(reporter.as_ref(), e))?;

    info!(
        channels = summary.channels,
        messages = summary.messages,
        purged = summary.purged,
        splits = summary.splits,
        "Delivery complete"
    );

    Ok(())
}
