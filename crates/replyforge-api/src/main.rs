//! ReplyForge CLI entry point.
//!
//! Binary name: `rforge`
//!
//! Parses CLI arguments, sets up tracing, opens the data directory, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use replyforge_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::generate::GenerateArgs;
use cli::{Cli, Commands};
use state::AppState;

/// Filter directives for the verbosity flags; `RUST_LOG` overrides them.
fn filter_directives(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,replyforge_core=debug,replyforge_infra=debug,rforge=debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(filter_directives(cli.verbose, cli.quiet), cli.otel) {
        eprintln!("Warning: tracing setup failed: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "rforge", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Generate {
            content,
            platform,
            tone,
            feedback,
            candidates,
            images,
        } => {
            let args = GenerateArgs {
                content,
                platform,
                tone,
                feedback,
                candidates,
                images,
            };
            cli::generate::generate(&state, args, cli.json, cli.quiet).await?;
        }

        Commands::Chat {
            content,
            platform,
            tone,
        } => {
            if let Some(text) =
                cli::chat::loop_runner::run_chat_loop(&state, content, platform, tone).await?
            {
                println!("{text}");
            }
        }

        Commands::Session { action } => {
            cli::session::handle_session_command(action, &state, cli.json).await?;
        }

        Commands::Style { action } => {
            cli::style::handle_style_command(action, &state, cli.json).await?;
        }

        Commands::Config { action } => {
            cli::config::handle_config_command(action, &state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
