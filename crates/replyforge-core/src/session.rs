//! Panel session: one reply target and its refinement conversation.
//!
//! Owns the conversation state machine together with the tone, platform,
//! and the content being replied to. Persistence is a separate, explicit
//! flush (`persist`) whose failure never affects the in-memory state.

use tracing::{debug, info};

use replyforge_types::candidate::{Candidate, Platform, Tone};
use replyforge_types::config::Settings;
use replyforge_types::conversation::{
    BOOTSTRAP_INSTRUCTION, Conversation, SessionSnapshot, Turn, TurnId,
};
use replyforge_types::error::{GenerationError, RepositoryError};
use replyforge_types::generation::GenerationRequest;
use replyforge_types::storage::SESSION_SCOPE;

use crate::conversation::ConversationManager;
use crate::generator::ReplyGenerator;
use crate::storage::KvStore;

/// A single panel instance: the reply target plus its conversation.
#[derive(Debug, Clone)]
pub struct PanelSession {
    manager: ConversationManager,
    tone: Tone,
    platform: Platform,
    original_content: String,
}

impl PanelSession {
    pub fn new(platform: Platform, tone: Tone, original_content: impl Into<String>) -> Self {
        Self {
            manager: ConversationManager::new(),
            tone,
            platform,
            original_content: original_content.into(),
        }
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            manager: ConversationManager::from_conversation(snapshot.conversation),
            tone: snapshot.tone,
            platform: snapshot.platform,
            original_content: snapshot.original_content,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            conversation: self.manager.conversation().clone(),
            tone: self.tone,
            platform: self.platform,
            original_content: self.original_content.clone(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        self.manager.conversation()
    }

    pub fn manager(&self) -> &ConversationManager {
        &self.manager
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.tone = tone;
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn original_content(&self) -> &str {
        &self.original_content
    }

    /// Point the session at a reply target.
    ///
    /// A different target invalidates the conversation; the same target
    /// (ignoring surrounding whitespace) keeps it. Returns `true` when the
    /// conversation was reset.
    pub fn retarget(&mut self, content: impl Into<String>) -> bool {
        let content = content.into();
        if content.trim() == self.original_content.trim() {
            return false;
        }
        info!(
            platform = %self.platform,
            "reply target changed, resetting conversation"
        );
        self.original_content = content;
        self.manager.reset();
        true
    }

    pub fn begin_generation(
        &mut self,
        instruction: impl Into<String>,
        image_refs: Vec<String>,
    ) -> TurnId {
        self.manager.start_generation(instruction, image_refs)
    }

    pub fn regenerate(&mut self) -> TurnId {
        self.manager.regenerate()
    }

    pub fn retry_last(&mut self) -> Option<TurnId> {
        self.manager.retry_last()
    }

    /// Edit the user turn at `turn_index` and regenerate from there.
    ///
    /// # Panics
    ///
    /// Panics if `turn_index` is not a user turn.
    pub fn fork(&mut self, turn_index: usize, instruction: impl Into<String>) -> TurnId {
        self.manager.fork_from_user_turn(turn_index, instruction)
    }

    /// # Panics
    ///
    /// Panics on an invalid turn or candidate index.
    pub fn select(&mut self, turn_index: usize, candidate_index: usize) {
        self.manager.select_candidate(turn_index, candidate_index);
    }

    pub fn reset(&mut self) {
        self.manager.reset();
    }

    /// Build the request for the most recent user turn.
    ///
    /// The bootstrap instruction carries no feedback. Style samples are only
    /// used when the settings enable history.
    pub fn generation_request(
        &self,
        settings: &Settings,
        style_samples: &[String],
    ) -> GenerationRequest {
        let last_user = self
            .manager
            .turns()
            .iter()
            .rev()
            .find_map(Turn::as_user);

        let feedback = last_user
            .map(|u| u.instruction.as_str())
            .filter(|i| *i != BOOTSTRAP_INSTRUCTION)
            .unwrap_or_default();
        let images = last_user.map(|u| u.image_refs.clone()).unwrap_or_default();
        let samples = if settings.use_history {
            style_samples.to_vec()
        } else {
            Vec::new()
        };

        GenerationRequest::new(
            self.original_content.clone(),
            self.tone,
            self.platform,
            settings.num_candidates(),
        )
        .with_feedback(feedback)
        .with_images(images)
        .with_summary(self.manager.build_context_summary())
        .with_style_samples(samples)
    }

    /// Route a generation outcome to the pending turn. Returns `false` for a
    /// stale result.
    pub fn complete(
        &mut self,
        turn_id: TurnId,
        outcome: Result<Vec<Candidate>, GenerationError>,
    ) -> bool {
        match outcome {
            Ok(candidates) => self.manager.resolve_generation(turn_id, candidates),
            Err(err) => self.manager.reject_generation(turn_id, err.to_string()),
        }
    }

    /// Record a generation that could not be started (missing credentials).
    pub fn fail_unconfigured(
        &mut self,
        instruction: impl Into<String>,
        image_refs: Vec<String>,
        error: &GenerationError,
    ) -> TurnId {
        self.manager
            .fail_immediately(instruction, image_refs, error.to_string())
    }

    /// Build the request for `turn_id`, run it, and settle the turn.
    pub async fn fulfil(
        &mut self,
        generator: &ReplyGenerator,
        settings: &Settings,
        style_samples: &[String],
        turn_id: TurnId,
    ) -> bool {
        let request = self.generation_request(settings, style_samples);
        let outcome = generator.generate(&request).await;
        self.complete(turn_id, outcome)
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.manager.selected_text()
    }

    /// Flush a snapshot to the store under the session's platform.
    pub async fn persist(&self, store: &impl KvStore) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(self.snapshot())
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        store
            .set(SESSION_SCOPE, &self.platform.to_string(), &value)
            .await?;
        debug!(
            platform = %self.platform,
            turns = self.conversation().len(),
            "session persisted"
        );
        Ok(())
    }

    /// Restore the persisted session for `platform`, if any.
    pub async fn load(
        store: &impl KvStore,
        platform: Platform,
    ) -> Result<Option<Self>, RepositoryError> {
        let Some(value) = store.get(SESSION_SCOPE, &platform.to_string()).await? else {
            return Ok(None);
        };
        let snapshot: SessionSnapshot = serde_json::from_value(value)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        Ok(Some(Self::from_snapshot(snapshot)))
    }

    /// Remove the persisted session for `platform`.
    pub async fn clear(store: &impl KvStore, platform: Platform) -> Result<(), RepositoryError> {
        store.delete(SESSION_SCOPE, &platform.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::BoxLlmProvider;
    use crate::testing::{MemoryKvStore, MockProvider};
    use replyforge_types::llm::LlmError;

    fn session() -> PanelSession {
        PanelSession::new(Platform::Twitter, Tone::Match, "Hot take: tabs > spaces")
    }

    fn one(text: &str) -> Vec<Candidate> {
        Candidate::new(text).into_iter().collect()
    }

    #[test]
    fn test_retarget_same_content_keeps_conversation() {
        let mut s = session();
        s.begin_generation(BOOTSTRAP_INSTRUCTION, Vec::new());
        assert!(!s.retarget("  Hot take: tabs > spaces "));
        assert_eq!(s.conversation().len(), 2);
    }

    #[test]
    fn test_retarget_new_content_resets() {
        let mut s = session();
        let stale = s.begin_generation(BOOTSTRAP_INSTRUCTION, Vec::new());
        assert!(s.retarget("A completely different post"));
        assert!(s.conversation().is_empty());
        assert_eq!(s.original_content(), "A completely different post");
        assert!(!s.complete(stale, Ok(one("late"))));
    }

    #[test]
    fn test_bootstrap_request_has_no_feedback() {
        let mut s = session();
        s.begin_generation(BOOTSTRAP_INSTRUCTION, vec!["https://img/a.png".to_string()]);
        let req = s.generation_request(&Settings::default(), &["my post".to_string()]);

        assert_eq!(req.feedback_instruction, "");
        assert_eq!(req.image_refs, vec!["https://img/a.png"]);
        assert_eq!(req.num_candidates, 3);
        assert_eq!(req.style_samples, vec!["my post"]);
        assert_eq!(req.original_content, "Hot take: tabs > spaces");
        // Only the current user turn precedes the pending one.
        assert_eq!(
            req.prior_conversation_summary,
            "User instruction 1: \"Generate reply options\""
        );
    }

    #[test]
    fn test_refinement_request_carries_feedback_and_summary() {
        let mut s = session();
        let first = s.begin_generation(BOOTSTRAP_INSTRUCTION, Vec::new());
        s.complete(first, Ok(one("Spaces forever")));
        s.begin_generation("make it funnier", Vec::new());

        let mut settings = Settings::default();
        settings.use_history = false;
        let req = s.generation_request(&settings, &["ignored".to_string()]);

        assert_eq!(req.feedback_instruction, "make it funnier");
        assert!(req.style_samples.is_empty());
        let summary = &req.prior_conversation_summary;
        assert!(summary.contains("AI generated (selected): \"Spaces forever\""));
        assert!(summary.ends_with("User instruction 2: \"make it funnier\""));
    }

    #[test]
    fn test_complete_with_error_fails_turn() {
        let mut s = session();
        let id = s.begin_generation(BOOTSTRAP_INSTRUCTION, Vec::new());
        let err = GenerationError::Transport(LlmError::RateLimited {
            message: "rate_limit_error: slow down".to_string(),
            retry_after_ms: None,
        });
        assert!(s.complete(id, Err(err)));
        let last = s.conversation().last_assistant().unwrap();
        assert_eq!(last.error_text(), Some("rate_limit_error: slow down"));
    }

    #[test]
    fn test_fail_unconfigured_skips_pending() {
        let mut s = session();
        let err = GenerationError::Configuration("API key not configured".to_string());
        s.fail_unconfigured(BOOTSTRAP_INSTRUCTION, Vec::new(), &err);

        let last = s.conversation().last_assistant().unwrap();
        assert_eq!(last.error_text(), Some("API key not configured"));
        assert!(!s.conversation().has_pending());
    }

    #[tokio::test]
    async fn test_fulfil_resolves_pending_turn() {
        let generator = ReplyGenerator::new(
            BoxLlmProvider::new(MockProvider::replying("1. Tabs, obviously\n2. Spaces. Fight me.")),
            "mock-model",
        );
        let mut s = session();
        let id = s.begin_generation(BOOTSTRAP_INSTRUCTION, Vec::new());

        assert!(s.fulfil(&generator, &Settings::default(), &[], id).await);
        assert_eq!(s.selected_text(), Some("Tabs, obviously"));
        s.select(1, 1);
        assert_eq!(s.selected_text(), Some("Spaces. Fight me."));
    }

    #[tokio::test]
    async fn test_persist_and_load_roundtrip() {
        let store = MemoryKvStore::default();
        let mut s = session();
        s.set_tone(Tone::Witty);
        let id = s.begin_generation(BOOTSTRAP_INSTRUCTION, Vec::new());
        s.complete(id, Ok(one("saved reply")));
        s.persist(&store).await.unwrap();

        let loaded = PanelSession::load(&store, Platform::Twitter).await.unwrap().unwrap();
        assert_eq!(loaded.tone(), Tone::Witty);
        assert_eq!(loaded.conversation(), s.conversation());
        assert_eq!(loaded.selected_text(), Some("saved reply"));

        assert!(PanelSession::load(&store, Platform::Reddit).await.unwrap().is_none());

        PanelSession::clear(&store, Platform::Twitter).await.unwrap();
        assert!(PanelSession::load(&store, Platform::Twitter).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_snapshot_is_serialization_error() {
        let store = MemoryKvStore::default();
        store
            .set(SESSION_SCOPE, "twitter", &serde_json::json!({"tone": 42}))
            .await
            .unwrap();
        let err = PanelSession::load(&store, Platform::Twitter).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_persist_failure_leaves_state_intact() {
        let store = MemoryKvStore::failing();
        let mut s = session();
        let id = s.begin_generation(BOOTSTRAP_INSTRUCTION, Vec::new());
        assert!(s.persist(&store).await.is_err());
        assert!(s.complete(id, Ok(one("still works"))));
        assert_eq!(s.selected_text(), Some("still works"));
    }
}
