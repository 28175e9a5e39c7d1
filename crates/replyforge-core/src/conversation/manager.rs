//! Conversation state machine.
//!
//! Wraps a `Conversation` with the operations the panel issues in response to
//! user gestures and generation results. Invariants maintained here:
//!
//! - turns alternate user/assistant, starting with a user turn;
//! - an assistant turn leaves `Pending` at most once, in place;
//! - results are matched by [`TurnId`], never by position;
//! - `selected_index` is always in bounds for a ready turn's candidates.

use tracing::{debug, info, warn};

use replyforge_types::candidate::Candidate;
use replyforge_types::conversation::{
    AssistantState, AssistantTurn, BOOTSTRAP_INSTRUCTION, Conversation, Turn, TurnId, UserTurn,
};

/// Owns a conversation and applies state-machine operations to it.
#[derive(Debug, Clone, Default)]
pub struct ConversationManager {
    conversation: Conversation,
}

impl ConversationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a previously persisted conversation.
    ///
    /// A stored selection that no longer points at a candidate falls back to
    /// the first one.
    pub fn from_conversation(mut conversation: Conversation) -> Self {
        for turn in &mut conversation.turns {
            if let Turn::Assistant(AssistantTurn {
                state:
                    AssistantState::Ready {
                        candidates,
                        selected_index,
                    },
                ..
            }) = turn
            {
                if *selected_index >= candidates.len() && *selected_index != 0 {
                    warn!(
                        selected_index = *selected_index,
                        "restored selection out of range"
                    );
                    *selected_index = 0;
                }
            }
        }
        Self { conversation }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn turns(&self) -> &[Turn] {
        &self.conversation.turns
    }

    pub fn is_empty(&self) -> bool {
        self.conversation.is_empty()
    }

    /// Append a user instruction followed by a pending assistant turn.
    ///
    /// Returns the pending turn's id so the eventual result can be matched
    /// back to it with [`resolve_generation`](Self::resolve_generation) or
    /// [`reject_generation`](Self::reject_generation).
    pub fn start_generation(
        &mut self,
        instruction: impl Into<String>,
        image_refs: Vec<String>,
    ) -> TurnId {
        self.conversation.turns.push(Turn::User(UserTurn {
            id: TurnId::new(),
            instruction: instruction.into(),
            image_refs,
        }));
        self.push_pending()
    }

    /// Start over with the bootstrap instruction ("regenerate with current style").
    pub fn regenerate(&mut self) -> TurnId {
        self.reset();
        self.start_generation(BOOTSTRAP_INSTRUCTION, Vec::new())
    }

    /// Record a generation that failed before any model call was made
    /// (e.g., missing credentials). The assistant turn is created already
    /// `Failed` and never passes through `Pending`.
    pub fn fail_immediately(
        &mut self,
        instruction: impl Into<String>,
        image_refs: Vec<String>,
        error: impl Into<String>,
    ) -> TurnId {
        self.conversation.turns.push(Turn::User(UserTurn {
            id: TurnId::new(),
            instruction: instruction.into(),
            image_refs,
        }));
        let turn = AssistantTurn {
            id: TurnId::new(),
            state: AssistantState::Failed {
                error: error.into(),
            },
        };
        let id = turn.id;
        self.conversation.turns.push(Turn::Assistant(turn));
        id
    }

    /// Settle a pending turn with its parsed candidates (`selected_index = 0`).
    ///
    /// Returns `false` without touching anything when no pending turn with
    /// that id exists, e.g. because the conversation was reset or forked while
    /// the request was in flight.
    pub fn resolve_generation(&mut self, turn_id: TurnId, candidates: Vec<Candidate>) -> bool {
        let count = candidates.len();
        let settled = self.settle(
            turn_id,
            AssistantState::Ready {
                candidates,
                selected_index: 0,
            },
        );
        if settled {
            info!(%turn_id, candidates = count, "generation resolved");
        }
        settled
    }

    /// Settle a pending turn as failed. Same lookup rules as
    /// [`resolve_generation`](Self::resolve_generation).
    pub fn reject_generation(&mut self, turn_id: TurnId, error: impl Into<String>) -> bool {
        let error = error.into();
        let settled = self.settle(turn_id, AssistantState::Failed {
            error: error.clone(),
        });
        if settled {
            info!(%turn_id, %error, "generation failed");
        }
        settled
    }

    /// Point the assistant turn at `turn_index` to a different candidate.
    ///
    /// # Panics
    ///
    /// Panics if `turn_index` is not a ready assistant turn or
    /// `candidate_index` is out of range. Both come from internal indices, so
    /// either is a caller bug.
    pub fn select_candidate(&mut self, turn_index: usize, candidate_index: usize) {
        let turn = self.conversation.turns.get_mut(turn_index);
        match turn {
            Some(Turn::Assistant(AssistantTurn {
                state:
                    AssistantState::Ready {
                        candidates,
                        selected_index,
                    },
                ..
            })) => {
                assert!(
                    candidate_index < candidates.len(),
                    "candidate index {candidate_index} out of range for {} candidates",
                    candidates.len()
                );
                *selected_index = candidate_index;
            }
            _ => panic!("turn {turn_index} is not a ready assistant turn"),
        }
    }

    /// Rewrite history from the user turn at `turn_index`: everything after it
    /// is discarded, its instruction is replaced, and a new pending assistant
    /// turn is appended. Only one path survives; this is not a branching tree.
    ///
    /// # Panics
    ///
    /// Panics if `turn_index` does not refer to a user turn.
    pub fn fork_from_user_turn(
        &mut self,
        turn_index: usize,
        new_instruction: impl Into<String>,
    ) -> TurnId {
        let discarded = self.conversation.turns.len().saturating_sub(turn_index + 1);
        match self.conversation.turns.get_mut(turn_index) {
            Some(Turn::User(user)) => user.instruction = new_instruction.into(),
            _ => panic!("turn {turn_index} is not a user turn"),
        }
        self.conversation.turns.truncate(turn_index + 1);
        info!(turn_index, discarded, "forked conversation");
        self.push_pending()
    }

    /// Re-issue the most recent user instruction, replacing whatever response
    /// followed it. Returns `None` when there is no user turn yet.
    pub fn retry_last(&mut self) -> Option<TurnId> {
        let (index, instruction) = self
            .conversation
            .turns
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, t)| t.as_user().map(|u| (i, u.instruction.clone())))?;
        Some(self.fork_from_user_turn(index, instruction))
    }

    /// Drop every turn ("new chat").
    pub fn reset(&mut self) {
        if !self.conversation.is_empty() {
            debug!(turns = self.conversation.len(), "resetting conversation");
        }
        self.conversation.turns.clear();
    }

    /// Prose rendering of every turn except the most recent, fed to the next
    /// generation request. Pending and failed assistant turns contribute
    /// nothing.
    pub fn build_context_summary(&self) -> String {
        let turns = &self.conversation.turns;
        let end = turns.len().saturating_sub(1);
        let mut lines = Vec::new();
        let mut user_number = 0;

        for turn in &turns[..end] {
            match turn {
                Turn::User(user) => {
                    user_number += 1;
                    lines.push(format!(
                        "User instruction {user_number}: \"{}\"",
                        user.instruction
                    ));
                }
                Turn::Assistant(assistant) => {
                    if let Some(selected) = assistant.selected() {
                        lines.push(format!("AI generated (selected): \"{}\"", selected.text()));
                    }
                }
            }
        }

        lines.join("\n")
    }

    /// Text of the selected candidate in the most recent ready turn.
    pub fn selected_text(&self) -> Option<&str> {
        self.conversation
            .turns
            .iter()
            .rev()
            .filter_map(Turn::as_assistant)
            .find_map(AssistantTurn::selected)
            .map(Candidate::text)
    }

    /// Index into `turns()` of the `n`th user turn (1-based), as numbered in
    /// the context summary and the chat display.
    pub fn user_turn_index(&self, n: usize) -> Option<usize> {
        if n == 0 {
            return None;
        }
        self.conversation
            .turns
            .iter()
            .enumerate()
            .filter(|(_, t)| t.as_user().is_some())
            .nth(n - 1)
            .map(|(i, _)| i)
    }

    /// Index of the most recent ready assistant turn.
    pub fn last_ready_index(&self) -> Option<usize> {
        self.conversation.turns.iter().rposition(|t| {
            matches!(
                t,
                Turn::Assistant(AssistantTurn {
                    state: AssistantState::Ready { .. },
                    ..
                })
            )
        })
    }

    fn push_pending(&mut self) -> TurnId {
        let turn = AssistantTurn::pending();
        let id = turn.id;
        self.conversation.turns.push(Turn::Assistant(turn));
        debug!(turn_id = %id, "generation pending");
        id
    }

    fn settle(&mut self, turn_id: TurnId, state: AssistantState) -> bool {
        let turn = self
            .conversation
            .turns
            .iter_mut()
            .find_map(|t| match t {
                Turn::Assistant(a) if a.id == turn_id => Some(a),
                _ => None,
            });

        match turn {
            Some(turn) if turn.is_loading() => {
                turn.state = state;
                true
            }
            Some(_) => {
                warn!(%turn_id, "ignoring result for an already settled turn");
                false
            }
            None => {
                debug!(%turn_id, "discarding stale generation result");
                false
            }
        }
    }
}
