//! Conversation turn types for ReplyForge.
//!
//! A conversation is an ordered list of turns that alternate between a user
//! instruction and an assistant response carrying a set of reply candidates.
//! These are plain data types; the operations that mutate a conversation live
//! in `replyforge-core::conversation`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

use crate::candidate::{Candidate, Platform, Tone};

/// Instruction used for the first turn of a fresh conversation.
pub const BOOTSTRAP_INSTRUCTION: &str = "Generate reply options";

/// Process-unique identifier of a turn.
///
/// Used to match an asynchronous generation result back to the turn that
/// requested it, independent of the turn's position in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(pub Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user instruction, optionally with attached image references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTurn {
    pub id: TurnId,
    pub instruction: String,
    #[serde(default)]
    pub image_refs: Vec<String>,
}

/// Lifecycle of an assistant turn.
///
/// `Pending` transitions exactly once, in place, to `Ready` or `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AssistantState {
    Pending,
    Ready {
        candidates: Vec<Candidate>,
        selected_index: usize,
    },
    Failed {
        error: String,
    },
}

/// An assistant response within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantTurn {
    pub id: TurnId,
    #[serde(flatten)]
    pub state: AssistantState,
}

impl AssistantTurn {
    /// A fresh placeholder awaiting its generation result.
    pub fn pending() -> Self {
        Self {
            id: TurnId::new(),
            state: AssistantState::Pending,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, AssistantState::Pending)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.state, AssistantState::Failed { .. })
    }

    pub fn error_text(&self) -> Option<&str> {
        match &self.state {
            AssistantState::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Candidates of a ready turn; empty for pending or failed turns.
    pub fn candidates(&self) -> &[Candidate] {
        match &self.state {
            AssistantState::Ready { candidates, .. } => candidates,
            _ => &[],
        }
    }

    /// The currently selected candidate, if the turn is ready and non-empty.
    pub fn selected(&self) -> Option<&Candidate> {
        match &self.state {
            AssistantState::Ready {
                candidates,
                selected_index,
            } => candidates.get(*selected_index),
            _ => None,
        }
    }
}

/// One exchange step within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Turn {
    User(UserTurn),
    Assistant(AssistantTurn),
}

impl Turn {
    pub fn id(&self) -> TurnId {
        match self {
            Turn::User(t) => t.id,
            Turn::Assistant(t) => t.id,
        }
    }

    pub fn as_user(&self) -> Option<&UserTurn> {
        match self {
            Turn::User(t) => Some(t),
            Turn::Assistant(_) => None,
        }
    }

    pub fn as_assistant(&self) -> Option<&AssistantTurn> {
        match self {
            Turn::Assistant(t) => Some(t),
            Turn::User(_) => None,
        }
    }
}

/// Ordered sequence of alternating user/assistant turns, starting with a user turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last_assistant(&self) -> Option<&AssistantTurn> {
        self.turns.iter().rev().find_map(Turn::as_assistant)
    }

    /// Whether a generation is currently outstanding.
    pub fn has_pending(&self) -> bool {
        self.turns
            .iter()
            .filter_map(Turn::as_assistant)
            .any(AssistantTurn::is_loading)
    }
}

/// Persisted copy of a panel session, flushed to key-value storage so a
/// reopened session can pick up where it left off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub conversation: Conversation,
    pub tone: Tone,
    pub platform: Platform,
    pub original_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(texts: &[&str], selected_index: usize) -> AssistantTurn {
        AssistantTurn {
            id: TurnId::new(),
            state: AssistantState::Ready {
                candidates: texts.iter().filter_map(|t| Candidate::new(*t)).collect(),
                selected_index,
            },
        }
    }

    #[test]
    fn test_turn_ids_are_unique() {
        let a = TurnId::new();
        let b = TurnId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_pending_flags() {
        let turn = AssistantTurn::pending();
        assert!(turn.is_loading());
        assert!(!turn.is_error());
        assert!(turn.candidates().is_empty());
        assert!(turn.selected().is_none());
    }

    #[test]
    fn test_failed_flags() {
        let turn = AssistantTurn {
            id: TurnId::new(),
            state: AssistantState::Failed {
                error: "rate limited".to_string(),
            },
        };
        assert!(turn.is_error());
        assert_eq!(turn.error_text(), Some("rate limited"));
    }

    #[test]
    fn test_selected_candidate() {
        let turn = ready(&["one", "two"], 1);
        assert_eq!(turn.selected().unwrap().text(), "two");
    }

    #[test]
    fn test_turn_serde_shape() {
        let turn = Turn::Assistant(ready(&["Great idea!"], 0));
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["status"], "ready");
        assert_eq!(json["candidates"][0], "Great idea!");
        assert_eq!(json["selected_index"], 0);

        let parsed: Turn = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, turn);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let snapshot = SessionSnapshot {
            conversation: Conversation {
                turns: vec![
                    Turn::User(UserTurn {
                        id: TurnId::new(),
                        instruction: BOOTSTRAP_INSTRUCTION.to_string(),
                        image_refs: vec!["https://img.example/1.png".to_string()],
                    }),
                    Turn::Assistant(ready(&["a", "b"], 1)),
                ],
            },
            tone: Tone::Casual,
            platform: Platform::Reddit,
            original_content: "What's your favourite bird?".to_string(),
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.conversation, snapshot.conversation);
        assert_eq!(parsed.tone, Tone::Casual);
        assert_eq!(parsed.platform, Platform::Reddit);
        assert_eq!(parsed.original_content, snapshot.original_content);
    }

    #[test]
    fn test_has_pending() {
        let mut conversation = Conversation::new();
        assert!(!conversation.has_pending());
        conversation.turns.push(Turn::User(UserTurn {
            id: TurnId::new(),
            instruction: "x".to_string(),
            image_refs: Vec::new(),
        }));
        conversation.turns.push(Turn::Assistant(AssistantTurn::pending()));
        assert!(conversation.has_pending());
    }
}
