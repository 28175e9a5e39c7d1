//! OpenTelemetry GenAI semantic convention attribute names.
//!
//! The reply generator records its model call under these field names.
//! `tracing` field names must be literals at the call site, so the constants
//! are the reference the instrumentation is checked against.
//!
//! Span naming convention: `"{operation} {model}"`
//! (e.g., `"generate_replies claude-sonnet-4-5-20241022"`).

// --- Required attributes ---

/// The name of the operation being performed.
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "anthropic").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---

pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

/// The maximum number of output tokens requested.
pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

// --- ReplyForge attributes ---

/// Target platform of the generated replies ("twitter", "reddit", "generic").
pub const REPLYFORGE_PLATFORM: &str = "replyforge.platform";

/// Number of candidates asked of the model.
pub const REPLYFORGE_CANDIDATES_REQUESTED: &str = "replyforge.candidates.requested";

// --- Operation name values ---

/// One reply-candidate generation.
pub const OP_GENERATE_REPLIES: &str = "generate_replies";

// --- Provider name values ---

pub const PROVIDER_ANTHROPIC: &str = "anthropic";

pub const PROVIDER_OPENAI: &str = "openai";

/// Span name for an operation against a model.
pub fn span_name(operation: &str, model: &str) -> String {
    format!("{operation} {model}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_name() {
        assert_eq!(span_name(OP_GENERATE_REPLIES, "gpt-4o"), "generate_replies gpt-4o");
    }

    #[test]
    fn test_gen_ai_namespace() {
        for attr in [
            GEN_AI_OPERATION_NAME,
            GEN_AI_PROVIDER_NAME,
            GEN_AI_REQUEST_MODEL,
            GEN_AI_REQUEST_TEMPERATURE,
            GEN_AI_REQUEST_MAX_TOKENS,
        ] {
            assert!(attr.starts_with("gen_ai."), "{attr}");
        }
    }
}
