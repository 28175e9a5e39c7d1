//! Configuration for the OpenAI chat-completions provider.

use secrecy::SecretString;

use replyforge_types::llm::ProviderCapabilities;

/// Configuration used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model identifier used when a request does not name one.
    pub model: String,
    pub capabilities: ProviderCapabilities,
}

/// OpenAI defaults: `https://api.openai.com/v1`, vision enabled.
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key,
        model: model.into(),
        capabilities: ProviderCapabilities {
            vision: true,
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        },
    }
}

/// Whether `model` rejects `max_tokens` and needs `max_completion_tokens`.
pub fn uses_completion_tokens(model: &str) -> bool {
    ["5.2", "o1", "o3"].iter().any(|marker| model.contains(marker))
}
