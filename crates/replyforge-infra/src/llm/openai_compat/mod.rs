//! OpenAI chat-completions provider.
//!
//! Uses [`async_openai`] for type-safe request/response handling. The base URL
//! is configurable, so any OpenAI-compatible endpoint works.

pub mod config;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
    ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
    CreateChatCompletionRequest, FinishReason, ImageUrl,
};
use secrecy::ExposeSecret;

use replyforge_core::llm::LlmProvider;
use replyforge_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, ProviderCapabilities,
    StopReason, Usage,
};

use self::config::{OpenAiCompatConfig, uses_completion_tokens};

/// Provider for the OpenAI chat-completions API.
///
/// No Debug derive: the async-openai client holds the API key.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.expose_secret())
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            provider_name: config.provider_name,
            model: config.model,
            capabilities: config.capabilities,
        }
    }

    /// Provider for `https://api.openai.com/v1`.
    pub fn openai(api_key: secrecy::SecretString, model: &str) -> Self {
        Self::new(config::openai_defaults(api_key, model))
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        if let Some(ref system) = request.system {
            messages.push(system_message(system));
        }
        for msg in &request.messages {
            match msg.role {
                MessageRole::System => messages.push(system_message(&msg.content)),
                MessageRole::User => messages.push(user_message(msg)),
                // Reply generation sends no assistant history.
                MessageRole::Assistant => {}
            }
        }

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        let mut req = CreateChatCompletionRequest {
            messages,
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        };
        if uses_completion_tokens(&model) {
            req.max_completion_tokens = Some(request.max_tokens);
        } else {
            set_legacy_max_tokens(&mut req, request.max_tokens);
        }
        req.model = model;
        req
    }
}

fn system_message(text: &str) -> ChatCompletionRequestMessage {
    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
        content: ChatCompletionRequestSystemMessageContent::Text(text.to_string()),
        name: None,
    })
}

/// Plain text, or a text part followed by one `image_url` part per image.
fn user_message(msg: &Message) -> ChatCompletionRequestMessage {
    let content = if msg.images.is_empty() {
        ChatCompletionRequestUserMessageContent::Text(msg.content.clone())
    } else {
        let mut parts = vec![ChatCompletionRequestUserMessageContentPart::Text(
            ChatCompletionRequestMessageContentPartText {
                text: msg.content.clone(),
            },
        )];
        parts.extend(msg.images.iter().map(|url| {
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: url.clone(),
                        detail: None,
                    },
                },
            )
        }));
        ChatCompletionRequestUserMessageContent::Array(parts)
    };

    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
        content,
        name: None,
    })
}

// Older chat models only accept `max_tokens`.
#[allow(deprecated)]
fn set_legacy_max_tokens(req: &mut CreateChatCompletionRequest, max_tokens: u32) {
    req.max_tokens = Some(max_tokens);
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        let choice = response.choices.first();
        let content = choice
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        let stop_reason = match choice.and_then(|c| c.finish_reason.as_ref()) {
            Some(FinishReason::Length) => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        };
        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason,
            usage,
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
///
/// API errors keep the server's message verbatim.
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "invalid_api_key"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
            {
                LlmError::AuthenticationFailed {
                    message: api_err.message.clone(),
                }
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                LlmError::RateLimited {
                    message: api_err.message.clone(),
                    retry_after_ms: None,
                }
            } else if code == "server_error" || error_type == "overloaded_error" {
                LlmError::Overloaded(api_err.message.clone())
            } else {
                LlmError::Provider {
                    message: api_err.message.clone(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) => LlmError::AuthenticationFailed {
                message: "API error: 401".to_string(),
            },
            Some(429) => LlmError::RateLimited {
                message: "API error: 429".to_string(),
                retry_after_ms: None,
            },
            Some(status) => LlmError::Provider {
                message: format!("API error: {status}"),
            },
            None => LlmError::Provider {
                message: format!("HTTP request failed: {reqwest_err}"),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn provider(model: &str) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::openai(SecretString::from("sk-test"), model)
    }

    fn request(images: Vec<String>) -> CompletionRequest {
        let mut message = Message::user("Write replies");
        message.images = images;
        CompletionRequest {
            model: String::new(),
            messages: vec![message],
            system: Some("You generate replies".to_string()),
            max_tokens: 1024,
            temperature: Some(0.8),
        }
    }

    #[test]
    fn test_openai_factory() {
        let provider = provider("gpt-4o");
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model, "gpt-4o");
        assert!(provider.capabilities().vision);
    }

    #[test]
    fn test_build_request_system_then_user() {
        let req = provider("gpt-4o").build_request(&request(Vec::new()));
        assert_eq!(req.model, "gpt-4o");
        assert_eq!(req.messages.len(), 2);

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Write replies");
        assert_eq!(json["max_tokens"], 1024);
        assert!(json.get("max_completion_tokens").is_none());
        assert!((json["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_new_models_use_max_completion_tokens() {
        let req = provider("gpt-5.2-2025-12-11").build_request(&request(Vec::new()));
        assert_eq!(req.max_completion_tokens, Some(1024));
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_images_follow_text_part() {
        let req = provider("gpt-4o").build_request(&request(vec![
            "https://img.example/a.png".to_string(),
            "https://img.example/b.png".to_string(),
        ]));
        let json = serde_json::to_value(&req).unwrap();
        let parts = json["messages"][1]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[2]["image_url"]["url"], "https://img.example/b.png");
    }

    #[test]
    fn test_explicit_model_overrides_default() {
        let mut req = request(Vec::new());
        req.model = "o3-mini".to_string();
        let built = provider("gpt-4o").build_request(&req);
        assert_eq!(built.model, "o3-mini");
        assert_eq!(built.max_completion_tokens, Some(1024));
    }

    #[test]
    fn test_map_invalid_argument() {
        let err = map_openai_error(async_openai::error::OpenAIError::InvalidArgument(
            "bad".to_string(),
        ));
        assert!(matches!(err, LlmError::InvalidRequest(m) if m == "bad"));
    }

    fn api_error(json: serde_json::Value) -> async_openai::error::OpenAIError {
        async_openai::error::OpenAIError::ApiError(serde_json::from_value(json).unwrap())
    }

    #[test]
    fn test_auth_and_rate_limit_errors_keep_api_message() {
        let err = map_openai_error(api_error(serde_json::json!({
            "message": "Incorrect API key provided: sk-test",
            "type": "invalid_request_error",
            "param": null,
            "code": "invalid_api_key"
        })));
        assert!(matches!(err, LlmError::AuthenticationFailed { .. }));
        assert_eq!(err.to_string(), "Incorrect API key provided: sk-test");

        let err = map_openai_error(api_error(serde_json::json!({
            "message": "Rate limit reached for gpt-4o",
            "type": "requests",
            "param": null,
            "code": "rate_limit_exceeded"
        })));
        assert!(matches!(err, LlmError::RateLimited { .. }));
        assert_eq!(err.to_string(), "Rate limit reached for gpt-4o");
    }
}
