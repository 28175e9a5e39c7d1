//! Style sample commands: add, list, clear.
//!
//! Samples are the user's own posts. When `use_history` is on, the newest
//! few are quoted in the prompt as a writing style reference.

use anyhow::{Result, bail};
use clap::Subcommand;
use console::style;

use replyforge_core::style::StyleHistory;
use replyforge_types::generation::MAX_STYLE_SAMPLES;

use crate::cli::render::preview;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum StyleCommand {
    /// Save one of your posts as a style sample.
    Add {
        /// Post text.
        text: String,
    },

    /// List saved samples, newest first.
    #[command(alias = "ls")]
    List,

    /// Delete all saved samples.
    Clear,
}

pub async fn handle_style_command(cmd: StyleCommand, state: &AppState, json: bool) -> Result<()> {
    let history = StyleHistory::new(&state.kv_store);

    match cmd {
        StyleCommand::Add { text } => {
            if text.trim().is_empty() {
                bail!("sample text is empty");
            }
            let samples = history.add(&text).await?;
            if json {
                let result = serde_json::json!({ "added": text.trim(), "count": samples.len() });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!();
                println!(
                    "  {} Saved sample ({} stored)",
                    style("ok").green(),
                    samples.len()
                );
                if !state.settings.use_history {
                    println!(
                        "  {}",
                        style("use_history is off in config.toml; samples are not used yet.").dim()
                    );
                }
                println!();
            }
        }
        StyleCommand::List => {
            let samples = history.samples().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&samples)?);
                return Ok(());
            }
            println!();
            if samples.is_empty() {
                println!(
                    "  {} No samples. Add one with: {}",
                    style("i").blue().bold(),
                    style("rforge style add \"...\"").yellow()
                );
            }
            for (i, sample) in samples.iter().enumerate() {
                let marker = if i < MAX_STYLE_SAMPLES {
                    style("●").green()
                } else {
                    style("○").dim()
                };
                println!("  {marker} {:>2}. {}", i + 1, preview(sample, 96));
            }
            if samples.len() > MAX_STYLE_SAMPLES {
                println!();
                println!(
                    "  {}",
                    style(format!("● the newest {MAX_STYLE_SAMPLES} are used in prompts")).dim()
                );
            }
            println!();
        }
        StyleCommand::Clear => {
            history.clear().await?;
            if json {
                println!("{}", serde_json::json!({ "cleared": true }));
            } else {
                println!();
                println!("  {} Cleared style samples", style("ok").green());
                println!();
            }
        }
    }

    Ok(())
}
