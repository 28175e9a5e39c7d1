//! LlmProvider trait definition.

use replyforge_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities,
};

/// Trait for LLM provider backends (Anthropic, OpenAI).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). A reply
/// generation is a single non-streaming completion, so `complete` is the only
/// call a provider has to support.
///
/// Implementations live in replyforge-infra.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic", "openai").
    fn name(&self) -> &str;

    /// What this provider supports (vision, token limits).
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
