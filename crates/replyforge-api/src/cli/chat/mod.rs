//! Interactive refinement loop for `rforge chat`.
//!
//! Free text refines the current candidates; slash commands select, edit,
//! retry, and regenerate. The session is flushed to the key-value store
//! after every step. Entry point: `loop_runner::run_chat_loop`.

pub mod commands;
pub mod input;
pub mod loop_runner;
