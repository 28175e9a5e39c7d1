//! Configuration commands.

use anyhow::Result;
use clap::Subcommand;
use console::style;
use secrecy::{ExposeSecret, SecretString};

use replyforge_infra::config::resolve_api_key;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective settings (API key masked).
    Show,

    /// Print the path of config.toml.
    Path,
}

/// Last four characters of a key, the rest masked.
fn mask_key(key: &SecretString) -> String {
    let key = key.expose_secret();
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

pub async fn handle_config_command(cmd: ConfigCommand, state: &AppState, json: bool) -> Result<()> {
    let config_path = state.data_dir.join("config.toml");

    match cmd {
        ConfigCommand::Path => {
            if json {
                println!("{}", serde_json::json!({ "path": config_path }));
            } else {
                println!("{}", config_path.display());
            }
        }
        ConfigCommand::Show => {
            let settings = &state.settings;
            let key_source = match (&settings.api_key, resolve_api_key(settings)) {
                (_, None) => "missing".to_string(),
                (Some(k), Some(_)) if !k.trim().is_empty() => "config.toml".to_string(),
                _ => settings.provider.api_key_env().to_string(),
            };
            let masked = resolve_api_key(settings).as_ref().map(mask_key);

            if json {
                let result = serde_json::json!({
                    "data_dir": state.data_dir,
                    "config_file": config_path,
                    "config_file_exists": config_path.exists(),
                    "provider": settings.provider,
                    "model": settings.resolved_model(),
                    "api_key": masked,
                    "api_key_source": key_source,
                    "candidates": settings.num_candidates(),
                    "tone": settings.tone,
                    "use_history": settings.use_history,
                    "platform": settings.platform,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            let row = |label: &str, value: String| {
                println!("  {:<14} {value}", style(label).dim());
            };
            println!();
            row("data dir", state.data_dir.display().to_string());
            row(
                "config file",
                if config_path.exists() {
                    config_path.display().to_string()
                } else {
                    format!("{} (not found, using defaults)", config_path.display())
                },
            );
            row("provider", settings.provider.to_string());
            row("model", settings.resolved_model().to_string());
            row(
                "api key",
                match masked {
                    Some(m) => format!("{m} (from {key_source})"),
                    None => style("missing").red().to_string(),
                },
            );
            row("candidates", settings.num_candidates().to_string());
            row("tone", settings.tone.to_string());
            row("use history", settings.use_history.to_string());
            row("platform", settings.platform.to_string());
            println!();
        }
    }

    Ok(())
}
