//! Tracing setup and GenAI span attribute names for ReplyForge.

pub mod genai_attrs;
pub mod tracing_setup;
