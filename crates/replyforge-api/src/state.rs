//! Application state shared by the CLI commands.
//!
//! AppState pins the core ports to the concrete infra implementations:
//! the SQLite key-value store and the settings-selected LLM provider.

use std::path::PathBuf;

use anyhow::Context;
use tracing::warn;

use replyforge_core::generator::ReplyGenerator;
use replyforge_core::style::StyleHistory;
use replyforge_infra::config::{default_data_dir, load_settings, resolve_api_key};
use replyforge_infra::llm::create_generator;
use replyforge_infra::sqlite::kv::SqliteKvStore;
use replyforge_infra::sqlite::pool::DatabasePool;
use replyforge_types::config::Settings;
use replyforge_types::error::GenerationError;

pub struct AppState {
    pub data_dir: PathBuf,
    pub settings: Settings,
    pub kv_store: SqliteKvStore,
}

impl AppState {
    /// Resolve the data directory, load settings, and open the database.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = default_data_dir();
        let settings = load_settings(&data_dir).await;

        let db_pool = DatabasePool::open(&data_dir)
            .await
            .with_context(|| format!("Failed to open database in {}", data_dir.display()))?;

        Ok(Self {
            data_dir,
            settings,
            kv_store: SqliteKvStore::new(db_pool),
        })
    }

    /// Build a generator from the current settings.
    ///
    /// Fails with a configuration error when no API key can be found.
    pub fn generator(&self) -> Result<ReplyGenerator, GenerationError> {
        create_generator(&self.settings, resolve_api_key(&self.settings))
    }

    /// Saved style samples, or none when history is disabled or unreadable.
    pub async fn style_samples(&self) -> Vec<String> {
        if !self.settings.use_history {
            return Vec::new();
        }
        match StyleHistory::new(&self.kv_store).samples().await {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Failed to load style samples: {e}");
                Vec::new()
            }
        }
    }
}
