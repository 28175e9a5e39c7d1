//! Key-value storage types for ReplyForge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scope holding persisted panel sessions, keyed by platform name.
pub const SESSION_SCOPE: &str = "session";

/// Scope holding the user's saved style samples.
pub const STYLE_SCOPE: &str = "style";

/// Key of the style sample list within [`STYLE_SCOPE`].
pub const STYLE_SAMPLES_KEY: &str = "samples";

/// A stored key-value entry with timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvEntry {
    pub scope: String,
    pub key: String,
    pub value: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kv_entry_serialize() {
        let entry = KvEntry {
            scope: SESSION_SCOPE.to_string(),
            key: "twitter".to_string(),
            value: serde_json::json!({"tone": "match"}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["scope"], "session");
        assert_eq!(json["value"]["tone"], "match");
    }
}
