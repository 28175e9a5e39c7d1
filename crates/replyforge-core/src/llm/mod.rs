//! LLM provider abstractions for ReplyForge.
//!
//! - `LlmProvider`: RPITIT trait implemented by the vendor adapters in
//!   replyforge-infra
//! - `BoxLlmProvider`: object-safe wrapper so the provider can be chosen at
//!   runtime from settings

pub mod box_provider;
pub mod provider;

pub use box_provider::BoxLlmProvider;
pub use provider::LlmProvider;
