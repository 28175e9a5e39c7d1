//! LLM provider implementations.
//!
//! Concrete [`LlmProvider`](replyforge_core::llm::LlmProvider) implementations
//! for Anthropic and OpenAI, plus [`create_provider`], which picks one from
//! the user's settings.

pub mod anthropic;
pub mod openai_compat;

use secrecy::SecretString;

use replyforge_core::generator::ReplyGenerator;
use replyforge_core::llm::BoxLlmProvider;
use replyforge_types::config::Settings;
use replyforge_types::error::GenerationError;
use replyforge_types::llm::ProviderType;

use self::anthropic::AnthropicProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Message shown when no API key can be found.
pub const MISSING_KEY_MESSAGE: &str =
    "API key not configured. Set api_key in config.toml or the provider's environment variable.";

/// Create a [`BoxLlmProvider`] for the configured provider.
///
/// A missing key is a configuration error: it is detected before any request
/// is made.
pub fn create_provider(
    settings: &Settings,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, GenerationError> {
    let key = api_key
        .ok_or_else(|| GenerationError::Configuration(MISSING_KEY_MESSAGE.to_string()))?;
    let model = settings.resolved_model();

    match settings.provider {
        ProviderType::Anthropic => {
            let provider = AnthropicProvider::new(key, model.to_string())?;
            Ok(BoxLlmProvider::new(provider))
        }
        ProviderType::OpenAi => Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::openai(
            key, model,
        ))),
    }
}

/// Provider plus resolved model, ready to generate.
pub fn create_generator(
    settings: &Settings,
    api_key: Option<SecretString>,
) -> Result<ReplyGenerator, GenerationError> {
    let provider = create_provider(settings, api_key)?;
    tracing::debug!(
        provider = provider.name(),
        model = settings.resolved_model(),
        "provider ready"
    );
    Ok(ReplyGenerator::new(provider, settings.resolved_model()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_anthropic() {
        let provider =
            create_provider(&Settings::default(), Some(SecretString::from("sk-ant-test"))).unwrap();
        assert_eq!(provider.name(), "anthropic");
        assert!(provider.capabilities().vision);
    }

    #[test]
    fn test_create_provider_openai() {
        let settings = Settings {
            provider: ProviderType::OpenAi,
            ..Settings::default()
        };
        let provider = create_provider(&settings, Some(SecretString::from("sk-test"))).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let err = create_provider(&Settings::default(), None).err().unwrap();
        assert!(err.is_configuration());
        assert!(err.to_string().starts_with("API key not configured"));
    }

    #[test]
    fn test_create_generator_uses_resolved_model() {
        let settings = Settings {
            model: Some("claude-haiku-4-5".to_string()),
            ..Settings::default()
        };
        let generator = create_generator(&settings, Some(SecretString::from("k"))).unwrap();
        assert_eq!(generator.model(), "claude-haiku-4-5");
        assert_eq!(generator.provider_name(), "anthropic");
    }
}
