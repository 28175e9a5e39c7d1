//! Multi-turn refinement conversation.
//!
//! The [`manager::ConversationManager`] owns a
//! [`Conversation`](replyforge_types::conversation::Conversation) and applies
//! the edit/fork/regenerate operations to it. Generation results are matched
//! back to their placeholder turn by id, so a result that arrives after a
//! reset or fork is discarded instead of landing in the wrong conversation.

pub mod manager;

pub use manager::ConversationManager;
