use thiserror::Error;

use crate::llm::LlmError;

/// Why a generation produced no candidates set.
///
/// An empty candidate list is not an error; it is a valid `Ready` outcome.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Detected before any model call (e.g., missing API key).
    #[error("{0}")]
    Configuration(String),

    /// The model call itself failed (network, non-2xx, malformed body).
    #[error(transparent)]
    Transport(#[from] LlmError),
}

impl GenerationError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, GenerationError::Configuration(_))
    }
}

/// Errors from repository operations (used by trait definitions in replyforge-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = GenerationError::Configuration(
            "API key not configured. Set it in config.toml or the provider's environment variable."
                .to_string(),
        );
        assert!(err.is_configuration());
        assert!(err.to_string().starts_with("API key not configured"));
    }

    #[test]
    fn test_transport_error_is_transparent() {
        let err: GenerationError = LlmError::RateLimited {
            message: "rate limited".to_string(),
            retry_after_ms: None,
        }
        .into();
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
