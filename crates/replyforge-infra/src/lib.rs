//! Infrastructure layer for ReplyForge.
//!
//! Implements the ports defined in `replyforge-core`: LLM providers over HTTP
//! (Anthropic Messages API, OpenAI chat completions), the SQLite key-value
//! store, and the settings loader.

pub mod config;
pub mod llm;
pub mod sqlite;
