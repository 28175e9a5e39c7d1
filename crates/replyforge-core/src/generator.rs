//! Reply generation: prompt, one model call, parse.
//!
//! ReplyGenerator builds the prompt from a `GenerationRequest`, sends it
//! through the boxed provider inside a GenAI span, and turns the response
//! text into bounded candidates for the request's platform.

use tracing::{Instrument, debug, info, info_span};

use replyforge_types::candidate::Candidate;
use replyforge_types::error::GenerationError;
use replyforge_types::generation::GenerationRequest;
use replyforge_types::llm::{CompletionRequest, Message};

use crate::llm::box_provider::BoxLlmProvider;
use crate::parser::parse_candidates;
use crate::prompt::PromptBuilder;

/// Output budget per generation; enough for several long-form replies.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Sampling temperature for reply generation.
pub const DEFAULT_TEMPERATURE: f64 = 0.8;

/// Generates reply candidates through a runtime-selected provider.
pub struct ReplyGenerator {
    provider: BoxLlmProvider,
    model: String,
}

impl ReplyGenerator {
    pub fn new(provider: BoxLlmProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the completion request for a generation.
    ///
    /// Images are dropped when the provider cannot accept them.
    pub fn build_request(&self, request: &GenerationRequest) -> CompletionRequest {
        let mut message = Message::user(PromptBuilder::build(request));
        if request.has_images() {
            if self.provider.capabilities().vision {
                message.images = request.image_refs.clone();
            } else {
                debug!(
                    provider = self.provider.name(),
                    count = request.image_refs.len(),
                    "provider has no vision support, dropping images"
                );
            }
        }

        CompletionRequest {
            model: self.model.clone(),
            messages: vec![message],
            system: Some(PromptBuilder::system_prompt(request.platform)),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: Some(DEFAULT_TEMPERATURE),
        }
    }

    /// Run one generation and parse the result.
    ///
    /// An empty candidate list is a successful outcome; only the model call
    /// itself can fail here.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<Candidate>, GenerationError> {
        let completion = self.build_request(request);

        let span = info_span!(
            "gen_ai.generate_replies",
            otel.name = %format!("generate_replies {}", completion.model),
            gen_ai.operation.name = "generate_replies",
            gen_ai.provider.name = self.provider.name(),
            gen_ai.request.model = %completion.model,
            gen_ai.request.max_tokens = completion.max_tokens,
            gen_ai.request.temperature = ?completion.temperature,
            replyforge.platform = %request.platform,
            replyforge.candidates.requested = request.num_candidates,
        );

        let response = self.provider.complete(&completion).instrument(span).await?;

        let candidates = parse_candidates(
            &response.content,
            request.num_candidates,
            request.max_length(),
        );
        info!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = %response.stop_reason,
            requested = request.num_candidates,
            parsed = candidates.len(),
            "generation complete"
        );

        Ok(candidates)
    }
}
