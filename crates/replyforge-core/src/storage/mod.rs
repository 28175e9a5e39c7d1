//! Storage abstractions for ReplyForge.
//!
//! Implementations live in replyforge-infra.

pub mod kv_store;

pub use kv_store::KvStore;
