//! AnthropicProvider -- [`LlmProvider`] implementation for Anthropic Claude.
//!
//! Sends non-streaming requests to the Messages API (`/v1/messages`). The API
//! key is wrapped in [`secrecy::SecretString`] and only exposed when building
//! the request headers.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use replyforge_core::llm::LlmProvider;
use replyforge_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};

use super::types::{
    AnthropicContent, AnthropicContentBlock, AnthropicErrorBody, AnthropicImageSource,
    AnthropicInputBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse,
};

/// Anthropic Claude LLM provider.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl AnthropicProvider {
    const API_VERSION: &'static str = "2023-06-01";

    pub fn new(api_key: SecretString, model: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: "https://api.anthropic.com".to_string(),
            capabilities: Self::capabilities_for_model(&model),
            model,
        })
    }

    /// Override the base URL (proxies, local gateways).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn capabilities_for_model(model: &str) -> ProviderCapabilities {
        let known = ["sonnet", "opus", "haiku"].iter().any(|f| model.contains(f));
        ProviderCapabilities {
            vision: known,
            max_context_tokens: 200_000,
            max_output_tokens: if model.contains("opus") { 32_000 } else { 8_192 },
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into the Messages API body.
    ///
    /// A message with images becomes image blocks followed by one text block;
    /// otherwise the content is a plain string.
    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| {
                let content = if m.images.is_empty() {
                    AnthropicContent::Text(m.content.clone())
                } else {
                    let mut blocks: Vec<AnthropicInputBlock> = m
                        .images
                        .iter()
                        .map(|url| AnthropicInputBlock::Image {
                            source: AnthropicImageSource::Url { url: url.clone() },
                        })
                        .collect();
                    blocks.push(AnthropicInputBlock::Text {
                        text: m.content.clone(),
                    });
                    AnthropicContent::Blocks(blocks)
                };
                AnthropicMessage {
                    role: m.role.to_string(),
                    content,
                }
            })
            .collect();

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        AnthropicRequest {
            model,
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
            temperature: request.temperature,
        }
    }
}

// No Debug derive: the struct holds the API key.

/// Map a non-2xx response to an [`LlmError`].
///
/// The API's own `error.message` is preferred; without one the message is
/// `API error: <status>`.
pub(crate) fn error_from_status(status: u16, body: &str, retry_after: Option<&str>) -> LlmError {
    let message = serde_json::from_str::<AnthropicErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| format!("API error: {status}"));

    match status {
        401 => LlmError::AuthenticationFailed { message },
        429 => LlmError::RateLimited {
            message,
            retry_after_ms: retry_after
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(|secs| secs * 1000),
        },
        529 => LlmError::Overloaded(message),
        _ => LlmError::Provider { message },
    }
}

fn map_stop_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("max_tokens") => StopReason::MaxTokens,
        Some("stop_sequence") => StopReason::StopSequence,
        _ => StopReason::EndTurn,
    }
}

impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_anthropic_request(request);
        let url = self.url("/v1/messages");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let error_body = response.text().await.unwrap_or_default();
            return Err(error_from_status(
                status.as_u16(),
                &error_body,
                retry_after.as_deref(),
            ));
        }

        let resp: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = resp
            .content
            .iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text.as_str()),
                AnthropicContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(CompletionResponse {
            id: resp.id,
            content,
            model: resp.model,
            stop_reason: map_stop_reason(resp.stop_reason.as_deref()),
            usage: Usage {
                input_tokens: resp.usage.input_tokens,
                output_tokens: resp.usage.output_tokens,
            },
        })
    }
}
