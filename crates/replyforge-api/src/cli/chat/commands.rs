//! Slash command parsing for the chat loop.
//!
//! Commands start with `/`. Anything else is a refinement instruction.

use console::style;

use replyforge_types::candidate::Tone;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Select candidate N (1-based) of the latest replies.
    Select(usize),
    /// Rewrite instruction N (1-based) and regenerate from there.
    Edit(usize, String),
    /// Re-run the last instruction.
    Retry,
    /// Start over with a fresh set of replies.
    Regenerate,
    /// Clear the conversation.
    New,
    /// Change the tone used for the next generation.
    Tone(Tone),
    /// Attach an image URL to the next instruction.
    Image(String),
    /// Print the selected reply and exit.
    Use,
    /// Show the whole conversation.
    History,
    /// Exit the chat session.
    Quit,
    /// Malformed or unknown command, with a message for the user.
    Invalid(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/select" | "/s" => match parse_number(arg) {
            Some(n) => ChatCommand::Select(n),
            None => ChatCommand::Invalid("usage: /select N".to_string()),
        },
        "/edit" | "/e" => {
            let (n, text) = arg.split_once(char::is_whitespace).unwrap_or((arg, ""));
            match (parse_number(n), text.trim()) {
                (Some(n), text) if !text.is_empty() => ChatCommand::Edit(n, text.to_string()),
                _ => ChatCommand::Invalid("usage: /edit N <new instruction>".to_string()),
            }
        }
        "/retry" | "/r" => ChatCommand::Retry,
        "/regenerate" | "/regen" => ChatCommand::Regenerate,
        "/new" => ChatCommand::New,
        "/tone" => match arg.parse::<Tone>() {
            Ok(tone) => ChatCommand::Tone(tone),
            Err(_) => ChatCommand::Invalid(format!(
                "usage: /tone <{}>",
                Tone::ALL.map(|t| t.to_string()).join("|")
            )),
        },
        "/image" | "/img" if !arg.is_empty() => ChatCommand::Image(arg.to_string()),
        "/image" | "/img" => ChatCommand::Invalid("usage: /image <url>".to_string()),
        "/use" => ChatCommand::Use,
        "/history" => ChatCommand::History,
        "/quit" | "/exit" | "/q" => ChatCommand::Quit,
        other => ChatCommand::Invalid(format!("unknown command: {other}")),
    };
    Some(command)
}

/// Positive 1-based number.
fn parse_number(s: &str) -> Option<usize> {
    s.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("<text>", "Refine the replies with an instruction"),
        ("/select N", "Select reply N"),
        ("/edit N <text>", "Rewrite instruction N and regenerate from there"),
        ("/retry", "Re-run the last instruction"),
        ("/regenerate", "Start over with fresh replies"),
        ("/tone <tone>", "Change the tone"),
        ("/image <url>", "Attach an image to the next instruction"),
        ("/history", "Show the conversation"),
        ("/new", "Clear the conversation"),
        ("/use", "Print the selected reply and exit"),
        ("/quit", "Exit (the session is kept)"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (command, description) in rows {
        println!("  {:<16} {description}", style(command).cyan());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse("make it funnier"), None);
        assert_eq!(parse("  "), None);
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(parse("/select 2"), Some(ChatCommand::Select(2)));
        assert_eq!(parse("/s 1"), Some(ChatCommand::Select(1)));
        assert!(matches!(parse("/select 0"), Some(ChatCommand::Invalid(_))));
        assert!(matches!(parse("/select"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn test_parse_edit() {
        assert_eq!(
            parse("/edit 1 talk about birds"),
            Some(ChatCommand::Edit(1, "talk about birds".to_string()))
        );
        assert!(matches!(parse("/edit 1"), Some(ChatCommand::Invalid(_))));
        assert!(matches!(parse("/edit x text"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn test_parse_tone() {
        assert_eq!(parse("/tone Witty"), Some(ChatCommand::Tone(Tone::Witty)));
        assert!(matches!(parse("/tone grumpy"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn test_parse_image() {
        assert_eq!(
            parse("/image https://img.example/a.png"),
            Some(ChatCommand::Image("https://img.example/a.png".to_string()))
        );
        assert!(matches!(parse("/image"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("/retry"), Some(ChatCommand::Retry));
        assert_eq!(parse("/regen"), Some(ChatCommand::Regenerate));
        assert_eq!(parse("/new"), Some(ChatCommand::New));
        assert_eq!(parse("/use"), Some(ChatCommand::Use));
        assert_eq!(parse("/HISTORY"), Some(ChatCommand::History));
        assert_eq!(parse("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse("/dance"),
            Some(ChatCommand::Invalid("unknown command: /dance".to_string()))
        );
    }
}
