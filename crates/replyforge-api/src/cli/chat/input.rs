//! Line input for the chat loop.
//!
//! dialoguer prompts block, so each read runs on the blocking pool.

use dialoguer::Input;

/// Events produced by the input handler.
#[derive(Debug)]
pub enum InputEvent {
    /// User submitted a line (trimmed, possibly empty).
    Message(String),
    /// Input closed (Ctrl+D, Ctrl+C, or a terminal error).
    Eof,
}

/// Read one line with the given prompt.
pub async fn read_line(prompt: String) -> InputEvent {
    let read = tokio::task::spawn_blocking(move || {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    })
    .await;

    match read {
        Ok(Ok(line)) => InputEvent::Message(line.trim().to_string()),
        Ok(Err(_)) | Err(_) => InputEvent::Eof,
    }
}
