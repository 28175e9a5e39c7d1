//! In-memory test doubles for the core ports.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use replyforge_types::error::RepositoryError;
use replyforge_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};
use replyforge_types::storage::KvEntry;

use crate::llm::LlmProvider;
use crate::storage::KvStore;

/// Provider returning a canned reply or a canned error.
pub struct MockProvider {
    reply: Result<String, String>,
    capabilities: ProviderCapabilities,
}

impl MockProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            capabilities: ProviderCapabilities {
                vision: true,
                max_context_tokens: 200_000,
                max_output_tokens: 1024,
            },
        }
    }

    pub fn failing(error: LlmError) -> Self {
        Self {
            reply: Err(error.to_string()),
            ..Self::replying("")
        }
    }

    pub fn without_vision(mut self) -> Self {
        self.capabilities.vision = false;
        self
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        match &self.reply {
            Ok(text) => Ok(CompletionResponse {
                id: "mock-1".to_string(),
                content: text.clone(),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            }),
            Err(message) => Err(LlmError::Provider {
                message: message.clone(),
            }),
        }
    }
}

/// HashMap-backed `KvStore`; `failing()` rejects every write.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<(String, String), KvEntry>>,
    fail_writes: bool,
}

impl MemoryKvStore {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }
}

impl KvStore for MemoryKvStore {
    async fn get(
        &self,
        scope: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, RepositoryError> {
        Ok(self.get_entry(scope, key).await?.map(|e| e.value))
    }

    async fn set(
        &self,
        scope: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Connection);
        }
        let now = Utc::now();
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .entry((scope.to_string(), key.to_string()))
            .or_insert_with(|| KvEntry {
                scope: scope.to_string(),
                key: key.to_string(),
                value: serde_json::Value::Null,
                created_at: now,
                updated_at: now,
            });
        entry.value = value.clone();
        entry.updated_at = now;
        Ok(())
    }

    async fn delete(&self, scope: &str, key: &str) -> Result<(), RepositoryError> {
        self.entries
            .lock()
            .unwrap()
            .remove(&(scope.to_string(), key.to_string()));
        Ok(())
    }

    async fn list_keys(&self, scope: &str) -> Result<Vec<String>, RepositoryError> {
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .unwrap()
            .keys()
            .filter(|(s, _)| s == scope)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn get_entry(&self, scope: &str, key: &str) -> Result<Option<KvEntry>, RepositoryError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&(scope.to_string(), key.to_string()))
            .cloned())
    }
}
