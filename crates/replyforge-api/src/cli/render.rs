//! Styled terminal rendering of candidates and conversations.

use console::style;

use replyforge_types::candidate::{Candidate, Platform};
use replyforge_types::conversation::{AssistantState, AssistantTurn, Conversation, Turn};

/// Print numbered candidates with their length against the platform limit.
pub fn print_candidates(candidates: &[Candidate], selected: Option<usize>, platform: Platform) {
    if candidates.is_empty() {
        println!(
            "  {} No usable replies in the model output. Try /retry or a different instruction.",
            style("i").blue().bold()
        );
        return;
    }

    let limit = platform.max_reply_length();
    for (i, candidate) in candidates.iter().enumerate() {
        let marker = if selected == Some(i) {
            style("▸").green().bold().to_string()
        } else {
            " ".to_string()
        };
        let mut lines = candidate.text().lines();
        println!(
            "  {marker} {} {}",
            style(format!("{}.", i + 1)).cyan().bold(),
            lines.next().unwrap_or_default()
        );
        for line in lines {
            println!("       {line}");
        }
        println!(
            "       {}",
            style(format!("{}/{limit}", candidate.len())).dim()
        );
    }
}

/// Print the outcome of one assistant turn.
pub fn print_assistant(turn: &AssistantTurn, platform: Platform) {
    match &turn.state {
        AssistantState::Pending => {
            println!("  {} generating...", style("…").dim());
        }
        AssistantState::Failed { error } => {
            println!("  {} {}", style("✗").red().bold(), style(error).red());
        }
        AssistantState::Ready {
            candidates,
            selected_index,
        } => print_candidates(candidates, Some(*selected_index), platform),
    }
}

/// Print the whole conversation, numbering user instructions from 1.
pub fn print_conversation(conversation: &Conversation, platform: Platform) {
    if conversation.is_empty() {
        println!("  {} No conversation yet.", style("i").blue().bold());
        return;
    }

    let mut user_number = 0;
    for turn in &conversation.turns {
        match turn {
            Turn::User(user) => {
                user_number += 1;
                let images = match user.image_refs.len() {
                    0 => String::new(),
                    n => format!(" {}", style(format!("[{n} image(s)]")).dim()),
                };
                println!();
                println!(
                    "  {} {}{images}",
                    style(format!("#{user_number} you:")).yellow().bold(),
                    user.instruction
                );
            }
            Turn::Assistant(assistant) => print_assistant(assistant, platform),
        }
    }
    println!();
}

/// Shorten `text` to `max` characters on a single line.
pub fn preview(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("hello world", 20), "hello world");
    }

    #[test]
    fn test_preview_flattens_and_truncates() {
        assert_eq!(preview("line one\nline two and more", 12), "line one ...");
    }

    #[test]
    fn test_preview_counts_chars() {
        assert_eq!(preview("héllo wörld", 11), "héllo wörld");
    }
}
