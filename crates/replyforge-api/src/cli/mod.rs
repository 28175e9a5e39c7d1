//! CLI command definitions for the `rforge` binary.
//!
//! Uses clap derive macros for argument parsing. Resource commands follow a
//! noun-verb pattern (e.g., `rforge session list`, `rforge style add`).

pub mod chat;
pub mod config;
pub mod generate;
pub mod render;
pub mod session;
pub mod style;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use replyforge_types::candidate::{Platform, Tone};

/// Draft and refine social media replies with an LLM.
#[derive(Parser)]
#[command(name = "rforge", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate reply candidates once and print them.
    #[command(alias = "gen")]
    Generate {
        /// Content being replied to. Omit to draft an original post.
        content: Option<String>,

        /// Target platform (twitter, reddit, generic). Defaults to config.
        #[arg(short, long)]
        platform: Option<Platform>,

        /// Reply tone (match, professional, casual, witty, thoughtful).
        #[arg(short, long)]
        tone: Option<Tone>,

        /// Extra instruction for the model (e.g., "make it shorter").
        #[arg(short, long)]
        feedback: Option<String>,

        /// Number of candidates to request (1-10).
        #[arg(short = 'n', long)]
        candidates: Option<usize>,

        /// Image URL attached to the content (repeatable, at most 4 used).
        #[arg(long = "image", value_name = "URL")]
        images: Vec<String>,
    },

    /// Start an interactive refinement session.
    Chat {
        /// Content being replied to. Omit to resume the saved session.
        content: Option<String>,

        /// Target platform. Each platform keeps its own saved session.
        #[arg(short, long)]
        platform: Option<Platform>,

        /// Reply tone for this session.
        #[arg(short, long)]
        tone: Option<Tone>,
    },

    /// Inspect or clear saved refinement sessions.
    Session {
        #[command(subcommand)]
        action: session::SessionCommand,
    },

    /// Manage writing samples used as a style reference.
    Style {
        #[command(subcommand)]
        action: style::StyleCommand,
    },

    /// Show the effective configuration.
    Config {
        #[command(subcommand)]
        action: config::ConfigCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = Cli::parse_from([
            "rforge", "generate", "gm", "-p", "reddit", "-t", "witty", "-n", "5", "--image",
            "https://img.example/a.png", "--json",
        ]);
        assert!(cli.json);
        match cli.command {
            Commands::Generate {
                content,
                platform,
                tone,
                candidates,
                images,
                ..
            } => {
                assert_eq!(content.as_deref(), Some("gm"));
                assert_eq!(platform, Some(Platform::Reddit));
                assert_eq!(tone, Some(Tone::Witty));
                assert_eq!(candidates, Some(5));
                assert_eq!(images, vec!["https://img.example/a.png"]);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_rejects_unknown_tone() {
        assert!(Cli::try_parse_from(["rforge", "generate", "gm", "--tone", "angry"]).is_err());
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::parse_from(["rforge", "-vv", "config", "show"]);
        assert_eq!(cli.verbose, 2);
    }
}
