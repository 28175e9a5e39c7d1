//! Anthropic Claude provider.
//!
//! [`AnthropicProvider`] implements the
//! [`LlmProvider`](replyforge_core::llm::LlmProvider) trait for the Anthropic
//! Messages API, with URL image blocks for vision input.

pub mod client;
pub mod types;

pub use client::AnthropicProvider;
