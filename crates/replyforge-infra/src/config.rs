//! Settings loader and data-directory resolution for ReplyForge.
//!
//! Reads `config.toml` from the data directory (`~/.replyforge/` unless
//! `REPLYFORGE_DATA_DIR` is set) and deserializes it into [`Settings`]. Falls
//! back to defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use replyforge_types::config::Settings;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "REPLYFORGE_DATA_DIR";

/// Resolve the data directory: `REPLYFORGE_DATA_DIR`, else `~/.replyforge`.
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".replyforge")
}

/// SQLite URL for the database inside `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!(
        "sqlite://{}?mode=rwc",
        data_dir.join("replyforge.db").display()
    )
}

/// Load settings from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`Settings::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_settings(data_dir: &Path) -> Settings {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return Settings::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return Settings::default();
        }
    };

    match toml::from_str::<Settings>(&content) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            Settings::default()
        }
    }
}

/// API key from the settings file, else the provider's environment variable.
pub fn resolve_api_key(settings: &Settings) -> Option<SecretString> {
    resolve_api_key_with(settings, |name| std::env::var(name).ok())
}

/// [`resolve_api_key`] with an injectable environment lookup.
pub fn resolve_api_key_with(
    settings: &Settings,
    env: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    settings
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| env(settings.provider.api_key_env()).filter(|k| !k.trim().is_empty()))
        .map(|k| SecretString::from(k.trim().to_string()))
}
