//! Main chat loop orchestration.
//!
//! Restores (or creates) the platform's panel session, runs the first
//! generation when needed, then reads instructions until the user quits.

use console::style;
use tracing::{info, warn};

use replyforge_core::generator::ReplyGenerator;
use replyforge_core::session::PanelSession;
use replyforge_types::candidate::{Platform, Tone};
use replyforge_types::conversation::{BOOTSTRAP_INSTRUCTION, TurnId};
use replyforge_types::error::GenerationError;
use replyforge_types::generation::MAX_IMAGE_REFS;

use crate::cli::generate::spinner;
use crate::cli::render::{preview, print_assistant, print_conversation};
use crate::state::AppState;

use super::commands::{self, ChatCommand};
use super::input::{InputEvent, read_line};

/// Flush the session, logging instead of failing.
async fn persist(state: &AppState, session: &PanelSession) {
    if let Err(e) = session.persist(&state.kv_store).await {
        warn!("Failed to save session: {e}");
    }
}

/// Restore the saved session for `platform`, pointed at `content` if given.
async fn open_session(
    state: &AppState,
    platform: Platform,
    content: Option<String>,
    tone: Option<Tone>,
) -> PanelSession {
    let restored = match PanelSession::load(&state.kv_store, platform).await {
        Ok(session) => session,
        Err(e) => {
            warn!("Failed to load saved session, starting fresh: {e}");
            None
        }
    };

    let mut session = match (restored, content) {
        (Some(mut session), Some(content)) => {
            if session.retarget(content) {
                println!(
                    "  {} New reply target, previous conversation cleared.",
                    style("i").blue().bold()
                );
            }
            session
        }
        (Some(session), None) => session,
        (None, content) => PanelSession::new(
            platform,
            tone.unwrap_or(state.settings.tone),
            content.unwrap_or_default(),
        ),
    };
    if let Some(tone) = tone {
        session.set_tone(tone);
    }
    session
}

/// Run the generation for `turn_id`, save, and show the result.
async fn settle(
    state: &AppState,
    session: &mut PanelSession,
    generator: &ReplyGenerator,
    turn_id: TurnId,
) {
    let samples = state.style_samples().await;
    let progress = spinner("generating replies...", false);
    let applied = session
        .fulfil(generator, &state.settings, &samples, turn_id)
        .await;
    progress.finish_and_clear();

    persist(state, session).await;
    if applied {
        show_latest(session);
    }
}

fn show_latest(session: &PanelSession) {
    if let Some(turn) = session.conversation().last_assistant() {
        println!();
        print_assistant(turn, session.platform());
        println!();
    }
}

fn notice(message: impl std::fmt::Display) {
    println!("  {} {message}", style("!").yellow().bold());
}

fn print_banner(session: &PanelSession, generator: &Result<ReplyGenerator, GenerationError>) {
    println!();
    println!(
        "  {} ReplyForge {} {}",
        style("✎").bold(),
        style(session.platform()).cyan(),
        style(format!("({})", session.tone())).dim()
    );
    let target = if session.original_content().trim().is_empty() {
        "original post".to_string()
    } else {
        preview(session.original_content(), 72)
    };
    println!("  {} {}", style("replying to:").dim(), target);
    match generator {
        Ok(g) => println!(
            "  {} {} / {}",
            style("model:").dim(),
            g.provider_name(),
            g.model()
        ),
        Err(e) => println!("  {} {}", style("model:").dim(), style(e).red()),
    }
    println!(
        "  {}",
        style("Type an instruction, or /help for commands.").dim()
    );
    println!();
}

/// Run the interactive refinement loop. Returns the text chosen with `/use`.
pub async fn run_chat_loop(
    state: &AppState,
    content: Option<String>,
    platform: Option<Platform>,
    tone: Option<Tone>,
) -> anyhow::Result<Option<String>> {
    let platform = platform.unwrap_or(state.settings.platform);
    let mut session = open_session(state, platform, content, tone).await;
    let generator = state.generator();

    print_banner(&session, &generator);

    // A pending turn restored from storage belongs to a run that exited
    // before its generation settled.
    let interrupted = session.conversation().has_pending();
    if !session.conversation().is_empty() {
        print_conversation(session.conversation(), session.platform());
    }

    match &generator {
        Ok(g) if interrupted => {
            if let Some(id) = session.retry_last() {
                settle(state, &mut session, g, id).await;
            }
        }
        Ok(g) if session.conversation().is_empty() => {
            let id = session.begin_generation(BOOTSTRAP_INSTRUCTION, Vec::new());
            settle(state, &mut session, g, id).await;
        }
        Err(e) if interrupted => notice(format!("Cannot resume the interrupted generation: {e}")),
        Err(e) if session.conversation().is_empty() => {
            session.fail_unconfigured(BOOTSTRAP_INSTRUCTION, Vec::new(), e);
            persist(state, &session).await;
            show_latest(&session);
        }
        _ => {}
    }

    let mut staged_images: Vec<String> = Vec::new();

    loop {
        let prompt = format!("{}", style("refine").green());
        let line = match read_line(prompt).await {
            InputEvent::Message(line) => line,
            InputEvent::Eof => break,
        };
        if line.is_empty() {
            continue;
        }

        let Some(command) = commands::parse(&line) else {
            let images = std::mem::take(&mut staged_images);
            match &generator {
                Ok(g) => {
                    let id = session.begin_generation(line, images);
                    settle(state, &mut session, g, id).await;
                }
                Err(e) => {
                    session.fail_unconfigured(line, images, e);
                    persist(state, &session).await;
                    show_latest(&session);
                }
            }
            continue;
        };

        match command {
            ChatCommand::Help => commands::print_help(),
            ChatCommand::Quit => break,
            ChatCommand::History => print_conversation(session.conversation(), session.platform()),
            ChatCommand::Use => match session.selected_text() {
                Some(text) => return Ok(Some(text.to_string())),
                None => notice("No reply selected yet."),
            },
            ChatCommand::Select(n) => {
                let Some(index) = session.manager().last_ready_index() else {
                    notice("No replies to select from.");
                    continue;
                };
                let count = session.conversation().turns[index]
                    .as_assistant()
                    .map_or(0, |t| t.candidates().len());
                if n > count {
                    notice(format!("Pick a reply between 1 and {count}."));
                    continue;
                }
                session.select(index, n - 1);
                persist(state, &session).await;
                show_latest(&session);
            }
            ChatCommand::Tone(tone) => {
                session.set_tone(tone);
                persist(state, &session).await;
                println!(
                    "  {} Tone set to {}",
                    style("ok").green(),
                    style(tone).cyan()
                );
            }
            ChatCommand::Image(url) => {
                if staged_images.len() >= MAX_IMAGE_REFS {
                    notice(format!("At most {MAX_IMAGE_REFS} images per instruction."));
                } else {
                    staged_images.push(url);
                    println!(
                        "  {} Image attached to the next instruction ({}/{MAX_IMAGE_REFS})",
                        style("ok").green(),
                        staged_images.len()
                    );
                }
            }
            ChatCommand::New => {
                session.reset();
                persist(state, &session).await;
                println!("  {} Conversation cleared.", style("ok").green());
            }
            ChatCommand::Invalid(message) => notice(message),
            ChatCommand::Retry | ChatCommand::Regenerate | ChatCommand::Edit(..) => {
                let g = match &generator {
                    Ok(g) => g,
                    Err(e) => {
                        notice(e);
                        continue;
                    }
                };
                let id = match command {
                    ChatCommand::Retry => session.retry_last(),
                    ChatCommand::Regenerate => Some(session.regenerate()),
                    ChatCommand::Edit(n, text) => match session.manager().user_turn_index(n) {
                        Some(index) => Some(session.fork(index, text)),
                        None => {
                            notice(format!("There is no instruction #{n}."));
                            continue;
                        }
                    },
                    _ => None,
                };
                match id {
                    Some(id) => settle(state, &mut session, g, id).await,
                    None => notice("Nothing to retry yet."),
                }
            }
        }
    }

    info!(
        platform = %session.platform(),
        turns = session.conversation().len(),
        "chat session closed"
    );
    Ok(None)
}
