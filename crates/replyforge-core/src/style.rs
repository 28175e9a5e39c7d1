//! Saved writing samples used as a style reference.
//!
//! Samples are stored newest first as a JSON string array under
//! `style/samples`. Only the first few are injected into a prompt.

use tracing::debug;

use replyforge_types::error::RepositoryError;
use replyforge_types::storage::{STYLE_SAMPLES_KEY, STYLE_SCOPE};

use crate::storage::KvStore;

/// Number of samples retained in storage.
pub const MAX_STORED_SAMPLES: usize = 20;

/// Style sample history backed by a key-value store.
pub struct StyleHistory<'a, S: KvStore> {
    store: &'a S,
}

impl<'a, S: KvStore> StyleHistory<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All stored samples, newest first. Missing history is empty.
    pub async fn samples(&self) -> Result<Vec<String>, RepositoryError> {
        match self.store.get(STYLE_SCOPE, STYLE_SAMPLES_KEY).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| RepositoryError::Serialization(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    /// Add a sample at the front. A duplicate moves to the front instead of
    /// being stored twice; the oldest samples beyond [`MAX_STORED_SAMPLES`]
    /// are dropped. Blank text is ignored.
    pub async fn add(&self, text: &str) -> Result<Vec<String>, RepositoryError> {
        let text = text.trim();
        let mut samples = self.samples().await?;
        if text.is_empty() {
            return Ok(samples);
        }

        samples.retain(|s| s != text);
        samples.insert(0, text.to_string());
        samples.truncate(MAX_STORED_SAMPLES);

        let value = serde_json::to_value(&samples)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        self.store.set(STYLE_SCOPE, STYLE_SAMPLES_KEY, &value).await?;
        debug!(count = samples.len(), "style sample saved");
        Ok(samples)
    }

    pub async fn clear(&self) -> Result<(), RepositoryError> {
        self.store.delete(STYLE_SCOPE, STYLE_SAMPLES_KEY).await
    }
}
