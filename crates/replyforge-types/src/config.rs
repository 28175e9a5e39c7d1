//! User settings for ReplyForge.
//!
//! `Settings` represents the `config.toml` in the data directory. Every
//! field has a default, so an empty or missing file is a valid configuration.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::candidate::{Platform, Tone};
use crate::llm::ProviderType;

/// Upper bound on candidates per generation.
pub const MAX_CANDIDATES: usize = 10;

/// Top-level settings. Loaded from `~/.replyforge/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub provider: ProviderType,

    /// Model override; `None` uses the provider's default model.
    #[serde(default)]
    pub model: Option<String>,

    /// API key stored in plain text. Falls back to the provider's
    /// environment variable when absent.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Number of reply candidates to request per generation.
    #[serde(default = "default_candidates")]
    pub candidates: usize,

    #[serde(default)]
    pub tone: Tone,

    /// Inject the user's saved posts into the prompt as a style reference.
    #[serde(default = "default_use_history")]
    pub use_history: bool,

    #[serde(default)]
    pub platform: Platform,
}

fn default_candidates() -> usize {
    3
}

fn default_use_history() -> bool {
    true
}

impl Settings {
    /// The model to request, falling back to the provider default.
    pub fn resolved_model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Candidate count clamped to `1..=MAX_CANDIDATES`.
    pub fn num_candidates(&self) -> usize {
        self.candidates.clamp(1, MAX_CANDIDATES)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            model: None,
            api_key: None,
            candidates: default_candidates(),
            tone: Tone::default(),
            use_history: default_use_history(),
            platform: Platform::default(),
        }
    }
}

// Hand-written so the API key never shows up in logs or panic messages.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("candidates", &self.candidates)
            .field("tone", &self.tone)
            .field("use_history", &self.use_history)
            .field("platform", &self.platform)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.provider, ProviderType::Anthropic);
        assert_eq!(settings.num_candidates(), 3);
        assert_eq!(settings.tone, Tone::Match);
        assert!(settings.use_history);
        assert_eq!(settings.platform, Platform::Twitter);
        assert_eq!(settings.resolved_model(), "claude-sonnet-4-5-20241022");
    }

    #[test]
    fn test_settings_deserialize_empty() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.candidates, 3);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_settings_deserialize_with_values() {
        let toml_str = r#"
provider = "openai"
model = "gpt-4o"
api_key = "sk-test"
candidates = 5
tone = "witty"
use_history = false
platform = "reddit"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.provider, ProviderType::OpenAi);
        assert_eq!(settings.resolved_model(), "gpt-4o");
        assert_eq!(settings.num_candidates(), 5);
        assert_eq!(settings.tone, Tone::Witty);
        assert!(!settings.use_history);
        assert_eq!(settings.platform, Platform::Reddit);
    }

    #[test]
    fn test_num_candidates_clamped() {
        let mut settings = Settings::default();
        settings.candidates = 0;
        assert_eq!(settings.num_candidates(), 1);
        settings.candidates = 50;
        assert_eq!(settings.num_candidates(), MAX_CANDIDATES);
    }

    #[test]
    fn test_blank_model_uses_default() {
        let settings = Settings {
            provider: ProviderType::OpenAi,
            model: Some("  ".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.resolved_model(), "gpt-5.2-2025-12-11");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = Settings {
            api_key: Some("sk-very-secret".to_string()),
            ..Settings::default()
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
