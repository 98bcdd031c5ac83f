//! Offline template validation.

use super::fail;
use crate::collect::collect;
use clap::Args;
use console::{style, Emoji};
use herald_core::{HeraldConfig, Message, Reporter};
use std::path::PathBuf;

static CHECK: Emoji = Emoji("✓", "+");

/// Check command arguments.
#[derive(Args)]
pub struct CheckArgs {
    /// Directory containing the templates
    #[arg(long, env = "INPUT_CONTENT")]
    pub content: PathBuf,
}

/// Count messages by kind as (text, image, break).
fn tally(messages: &[Message]) -> (usize, usize, usize) {
    messages
        .iter()
        .fold((0, 0, 0), |(text, image, brk), message| match message {
            Message::Text { .. } => (text + 1, image, brk),
            Message::Image { .. } => (text, image + 1, brk),
            Message::Break => (text, image, brk + 1),
        })
}

/// Run the check command.
pub async fn run(args: CheckArgs, config: &HeraldConfig, reporter: &dyn Reporter) -> anyhow::Result<()> {
    let data = collect(&args.content, &config.templates.extension, reporter)
        .await
        .map_err(|e| fail(reporter, e))?;

    if data.is_empty() {
        return Ok(());
    }

    println!();
    for entry in &data {
        let (text, image, brk) = tally(&entry.messages);
        println!(
            "  {} {} -> channel {}: {} text, {} image, {} break",
            style(CHECK).green(),
            entry.path.display(),
            entry.channel_id,
            text,
            image,
            brk
        );
    }
    println!("\n{} template(s) ready", data.len());

    Ok(())
}
