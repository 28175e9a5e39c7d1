//! One-shot generation: `rforge generate`.

use std::time::Duration;

use anyhow::{Result, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use replyforge_core::session::PanelSession;
use replyforge_types::candidate::{Candidate, Platform, Tone};
use replyforge_types::conversation::BOOTSTRAP_INSTRUCTION;

use crate::cli::render::print_candidates;
use crate::state::AppState;

/// Arguments of `rforge generate`, with config defaults not yet applied.
pub struct GenerateArgs {
    pub content: Option<String>,
    pub platform: Option<Platform>,
    pub tone: Option<Tone>,
    pub feedback: Option<String>,
    pub candidates: Option<usize>,
    pub images: Vec<String>,
}

/// Spinner on stderr, hidden in quiet and JSON modes.
pub fn spinner(message: &'static str, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Run a single generation and print the candidates.
///
/// Nothing is persisted; use `rforge chat` to refine.
pub async fn generate(state: &AppState, args: GenerateArgs, json: bool, quiet: bool) -> Result<()> {
    let mut settings = state.settings.clone();
    if let Some(n) = args.candidates {
        settings.candidates = n;
    }
    let platform = args.platform.unwrap_or(settings.platform);
    let tone = args.tone.unwrap_or(settings.tone);

    let generator = state.generator()?;
    let samples = state.style_samples().await;

    let mut session = PanelSession::new(platform, tone, args.content.unwrap_or_default());
    let instruction = args
        .feedback
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| BOOTSTRAP_INSTRUCTION.to_string());
    let turn_id = session.begin_generation(instruction, args.images);

    let progress = spinner("generating replies...", json || quiet);
    session.fulfil(&generator, &settings, &samples, turn_id).await;
    progress.finish_and_clear();

    let Some(turn) = session.conversation().last_assistant() else {
        bail!("generation produced no result");
    };
    if let Some(error) = turn.error_text() {
        bail!("{error}");
    }
    let candidates = turn.candidates();

    if json {
        let result = serde_json::json!({
            "platform": platform,
            "tone": tone,
            "model": generator.model(),
            "candidates": candidates,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if quiet {
        candidates.iter().map(Candidate::text).for_each(|t| println!("{t}"));
    } else {
        println!();
        println!(
            "  {} {} replies ({}, {})",
            style("✎").bold(),
            style(platform).cyan(),
            style(tone).cyan(),
            style(generator.model()).dim()
        );
        println!();
        print_candidates(candidates, None, platform);
        println!();
    }

    Ok(())
}
