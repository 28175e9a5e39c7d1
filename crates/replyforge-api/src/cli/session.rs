//! Saved session commands: show, list, clear.
//!
//! Each platform keeps one refinement session in the `session` scope of the
//! key-value store.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use replyforge_core::session::PanelSession;
use replyforge_core::storage::KvStore;
use replyforge_types::candidate::Platform;
use replyforge_types::conversation::SessionSnapshot;
use replyforge_types::storage::SESSION_SCOPE;

use crate::cli::render::{preview, print_conversation};
use crate::state::AppState;

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Show the saved conversation for a platform.
    Show {
        /// Platform (defaults to config).
        #[arg(short, long)]
        platform: Option<Platform>,
    },

    /// List saved sessions.
    #[command(alias = "ls")]
    List,

    /// Delete the saved session for a platform.
    #[command(alias = "rm")]
    Clear {
        /// Platform (defaults to config).
        #[arg(short, long)]
        platform: Option<Platform>,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_session_command(
    cmd: SessionCommand,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match cmd {
        SessionCommand::Show { platform } => {
            show_session(state, platform.unwrap_or(state.settings.platform), json).await
        }
        SessionCommand::List => list_sessions(state, json).await,
        SessionCommand::Clear { platform, force } => {
            clear_session(
                state,
                platform.unwrap_or(state.settings.platform),
                force,
                json,
            )
            .await
        }
    }
}

async fn show_session(state: &AppState, platform: Platform, json: bool) -> Result<()> {
    let session = PanelSession::load(&state.kv_store, platform).await?;

    if json {
        let snapshot = session.as_ref().map(PanelSession::snapshot);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let Some(session) = session else {
        println!();
        println!(
            "  {} No saved session for {}. Start one with: {}",
            style("i").blue().bold(),
            style(platform).cyan(),
            style(format!("rforge chat \"...\" --platform {platform}")).yellow()
        );
        println!();
        return Ok(());
    };

    println!();
    println!(
        "  {} {} session ({})",
        style("✎").bold(),
        style(session.platform()).cyan(),
        style(session.tone()).dim()
    );
    if !session.original_content().trim().is_empty() {
        println!(
            "  {} {}",
            style("replying to:").dim(),
            preview(session.original_content(), 72)
        );
    }
    print_conversation(session.conversation(), session.platform());
    if let Some(text) = session.selected_text() {
        println!("  {} {}", style("selected:").green().bold(), text);
        println!();
    }
    Ok(())
}

async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    let keys = state.kv_store.list_keys(SESSION_SCOPE).await?;

    let mut rows = Vec::new();
    for key in keys {
        let Some(entry) = state.kv_store.get_entry(SESSION_SCOPE, &key).await? else {
            continue;
        };
        // An unreadable snapshot is still listed so it can be cleared.
        let snapshot = serde_json::from_value::<SessionSnapshot>(entry.value).ok();
        rows.push((key, snapshot, entry.updated_at));
    }

    if json {
        let result: Vec<_> = rows
            .iter()
            .map(|(key, snapshot, updated_at)| {
                serde_json::json!({
                    "platform": key,
                    "turns": snapshot.as_ref().map(|s| s.conversation.len()),
                    "tone": snapshot.as_ref().map(|s| s.tone),
                    "original_content": snapshot.as_ref().map(|s| &s.original_content),
                    "updated_at": updated_at,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!();
        println!(
            "  {} No saved sessions. Start one with: {}",
            style("i").blue().bold(),
            style("rforge chat \"...\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Platform").fg(Color::White),
        Cell::new("Tone").fg(Color::White),
        Cell::new("Turns").fg(Color::White),
        Cell::new("Replying to").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for (key, snapshot, updated_at) in &rows {
        let updated = updated_at.format("%Y-%m-%d %H:%M").to_string();
        match snapshot {
            Some(s) => table.add_row(vec![
                Cell::new(key).fg(Color::Cyan),
                Cell::new(s.tone.to_string()).fg(Color::White),
                Cell::new(s.conversation.len().to_string()).fg(Color::White),
                Cell::new(preview(&s.original_content, 48)).fg(Color::DarkGrey),
                Cell::new(updated).fg(Color::DarkGrey),
            ]),
            None => table.add_row(vec![
                Cell::new(key).fg(Color::Cyan),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("unreadable").fg(Color::Red),
                Cell::new(updated).fg(Color::DarkGrey),
            ]),
        };
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

async fn clear_session(
    state: &AppState,
    platform: Platform,
    force: bool,
    json: bool,
) -> Result<()> {
    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete the saved {} session?", style(platform).red().bold()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    PanelSession::clear(&state.kv_store, platform).await?;

    if json {
        let result = serde_json::json!({ "cleared": platform });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Cleared the {} session",
            style("ok").green(),
            style(platform).cyan()
        );
        println!();
    }
    Ok(())
}
