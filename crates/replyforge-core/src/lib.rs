//! Business logic and port definitions for ReplyForge.
//!
//! This crate turns raw model output into reply candidates, tracks the
//! multi-turn refinement conversation, and assembles prompts. It defines the
//! "ports" (`LlmProvider`, `KvStore`) that the infrastructure layer
//! implements, and depends only on `replyforge-types` -- never on
//! `replyforge-infra` or any network/database crate.

pub mod conversation;
pub mod generator;
pub mod llm;
pub mod parser;
pub mod prompt;
pub mod session;
pub mod storage;
pub mod style;

#[cfg(test)]
mod testing;
