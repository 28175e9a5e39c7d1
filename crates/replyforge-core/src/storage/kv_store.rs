//! Key-value store trait.

use std::future::Future;

use replyforge_types::error::RepositoryError;
use replyforge_types::storage::KvEntry;

/// Scoped key-value persistent storage.
///
/// Stores arbitrary JSON values keyed by `(scope, key)`. Sessions live under
/// the `session` scope keyed by platform; style samples under `style`.
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait KvStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        scope: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<serde_json::Value>, RepositoryError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        scope: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a key. No-op if key does not exist.
    fn delete(
        &self,
        scope: &str,
        key: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// List all keys in a scope.
    fn list_keys(
        &self,
        scope: &str,
    ) -> impl Future<Output = Result<Vec<String>, RepositoryError>> + Send;

    /// Get the full entry including timestamps.
    fn get_entry(
        &self,
        scope: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<KvEntry>, RepositoryError>> + Send;
}
