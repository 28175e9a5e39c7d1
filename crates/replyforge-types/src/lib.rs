//! Shared domain types for ReplyForge.
//!
//! This crate contains the data model used across the workspace:
//! reply candidates, conversation turns, generation requests, settings,
//! LLM request/response shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod candidate;
pub mod config;
pub mod conversation;
pub mod error;
pub mod generation;
pub mod llm;
pub mod storage;
