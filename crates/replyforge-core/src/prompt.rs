//! Prompt builder for reply generation.
//!
//! Assembles the single user-facing instruction string from a
//! [`GenerationRequest`]. Sections are separated by blank lines; optional
//! sections (images, style reference, previous conversation, feedback) are
//! omitted entirely when they have no content.

use replyforge_types::candidate::Platform;
use replyforge_types::generation::GenerationRequest;

/// Placeholder used when there is nothing to reply to.
const NO_CONTENT: &str = "No specific content provided - generate original posts";

/// Builds generation prompts from typed requests.
///
/// Layout:
/// ```text
/// You are a social media writing assistant helping compose ...
/// TASK: Generate N different reply options ...
/// ORIGINAL CONTENT TO REPLY TO:
/// "..."
/// [image note]
/// TONE: ...
/// USER'S WRITING STYLE REFERENCE: ...
/// PREVIOUS CONVERSATION: ...
/// ADDITIONAL INSTRUCTIONS FROM USER: ...
/// REQUIREMENTS: ...
/// OUTPUT FORMAT: ...
/// ```
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the complete prompt for one generation.
    pub fn build(request: &GenerationRequest) -> String {
        let n = request.num_candidates;
        let mut sections = Vec::with_capacity(10);

        sections.push(role_line(request.platform).to_string());
        sections.push(format!(
            "TASK: Generate {n} different reply options for the following {}.",
            content_noun(request.platform)
        ));

        let original = request.original_content.trim();
        let original = if original.is_empty() { NO_CONTENT } else { original };
        sections.push(format!("ORIGINAL CONTENT TO REPLY TO:\n\"{original}\""));

        if request.has_images() {
            sections.push(format!(
                "[This {} also contains images/media which are provided for context. \
                 Consider the visual content in your reply.]",
                content_noun(request.platform)
            ));
        }

        sections.push(format!("TONE: {}", request.tone.description()));

        let samples: Vec<String> = request
            .style_samples
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .enumerate()
            .map(|(i, s)| format!("{}. \"{s}\"", i + 1))
            .collect();
        if !samples.is_empty() {
            sections.push(format!(
                "USER'S WRITING STYLE REFERENCE:\n{}",
                samples.join("\n")
            ));
        }

        let summary = request.prior_conversation_summary.trim();
        if !summary.is_empty() {
            sections.push(format!("PREVIOUS CONVERSATION:\n{summary}"));
        }

        let feedback = request.feedback_instruction.trim();
        if !feedback.is_empty() {
            sections.push(format!("ADDITIONAL INSTRUCTIONS FROM USER: {feedback}"));
        }

        sections.push(requirements(request));
        sections.push(output_format(request.platform, n));

        sections.join("\n\n")
    }

    /// System message for providers that take one separately.
    pub fn system_prompt(platform: Platform) -> String {
        let what = match platform {
            Platform::Twitter => "Twitter/X replies",
            Platform::Reddit => "Reddit comments",
            Platform::Generic => "replies for text fields on web pages",
        };
        format!(
            "You are a helpful assistant that generates {what}. \
             Follow the user's instructions exactly and return only the numbered replies."
        )
    }
}

fn role_line(platform: Platform) -> &'static str {
    match platform {
        Platform::Twitter => {
            "You are a social media writing assistant helping compose Twitter/X replies."
        }
        Platform::Reddit => {
            "You are a social media writing assistant helping compose Reddit comments."
        }
        Platform::Generic => {
            "You are a writing assistant helping compose a reply in a text field on a web page."
        }
    }
}

fn content_noun(platform: Platform) -> &'static str {
    match platform {
        Platform::Twitter => "tweet",
        Platform::Reddit => "post",
        Platform::Generic => "content",
    }
}

fn requirements(request: &GenerationRequest) -> String {
    let length_rule = match request.platform {
        Platform::Twitter => format!(
            "Each reply MUST be under {} characters (Twitter's limit)",
            request.max_length()
        ),
        _ => format!(
            "Each reply may span multiple paragraphs but MUST stay under {} characters",
            request.max_length()
        ),
    };

    let mut rules = vec![
        length_rule,
        "Make replies feel natural and human - avoid obvious AI patterns".to_string(),
        "Each reply should be notably different from the others".to_string(),
        format!(
            "Match the energy and context of the original {}",
            content_noun(request.platform)
        ),
        "Be engaging and encourage conversation when appropriate".to_string(),
        "Avoid generic phrases like \"Great point!\" or \"Couldn't agree more!\"".to_string(),
        "Don't use hashtags unless specifically relevant".to_string(),
        "Don't use emojis unless the tone calls for it".to_string(),
    ];
    if request.has_images() {
        rules.push("Reference or react to the visual content if relevant".to_string());
    }

    let numbered: Vec<String> = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {rule}", i + 1))
        .collect();
    format!("REQUIREMENTS:\n{}", numbered.join("\n"))
}

fn output_format(platform: Platform, n: usize) -> String {
    let layout = if platform.is_long_form() {
        format!(
            "Return ONLY the replies, numbered 1-{n}. Start each reply on a new line with its \
             number; further paragraphs of the same reply follow on the next lines without a number."
        )
    } else {
        format!("Return ONLY the replies, one per line, numbered 1-{n}.")
    };

    let ordinals = ["First", "Second", "Third"];
    let example: Vec<String> = ordinals
        .iter()
        .take(n.min(ordinals.len()))
        .enumerate()
        .map(|(i, ord)| format!("{}. [{ord} reply option]", i + 1))
        .collect();

    format!(
        "OUTPUT FORMAT:\n{layout}\nDo not include any other text, explanations, or formatting.\n\n\
         Example output format:\n{}",
        example.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use replyforge_types::candidate::Tone;

    fn request(platform: Platform) -> GenerationRequest {
        GenerationRequest::new("Just shipped my first Rust crate!", Tone::Witty, platform, 3)
    }

    #[test]
    fn test_build_minimal_twitter_prompt() {
        let prompt = PromptBuilder::build(&request(Platform::Twitter));

        assert!(prompt.starts_with(
            "You are a social media writing assistant helping compose Twitter/X replies."
        ));
        assert!(
            prompt.contains("TASK: Generate 3 different reply options for the following tweet.")
        );
        assert!(
            prompt.contains("ORIGINAL CONTENT TO REPLY TO:\n\"Just shipped my first Rust crate!\"")
        );
        assert!(prompt.contains("TONE: Witty, clever, and humorous"));
        assert!(prompt.contains("1. Each reply MUST be under 280 characters"));
        assert!(prompt.contains("numbered 1-3"));

        assert!(!prompt.contains("USER'S WRITING STYLE REFERENCE"));
        assert!(!prompt.contains("PREVIOUS CONVERSATION"));
        assert!(!prompt.contains("ADDITIONAL INSTRUCTIONS"));
        assert!(!prompt.contains("images/media"));
        assert!(!prompt.contains("9. "));
    }

    #[test]
    fn test_empty_content_uses_placeholder() {
        let req = GenerationRequest::new("   ", Tone::Match, Platform::Twitter, 2);
        let prompt = PromptBuilder::build(&req);
        assert!(prompt.contains(&format!("\"{NO_CONTENT}\"")));
    }

    #[test]
    fn test_section_order() {
        let req = request(Platform::Twitter)
            .with_images(vec!["https://img.example/a.png".to_string()])
            .with_style_samples(vec!["my old post".to_string()])
            .with_summary("User instruction 1: \"Generate reply options\"")
            .with_feedback("make it funnier");
        let prompt = PromptBuilder::build(&req);

        let order = [
            "TASK:",
            "ORIGINAL CONTENT TO REPLY TO:",
            "images/media",
            "TONE:",
            "USER'S WRITING STYLE REFERENCE:\n1. \"my old post\"",
            "PREVIOUS CONVERSATION:\nUser instruction 1",
            "ADDITIONAL INSTRUCTIONS FROM USER: make it funnier",
            "REQUIREMENTS:",
            "9. Reference or react to the visual content",
            "OUTPUT FORMAT:",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|needle| prompt.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_blank_style_samples_skipped() {
        let req = request(Platform::Twitter)
            .with_style_samples(vec!["  ".to_string(), "kept".to_string()]);
        let prompt = PromptBuilder::build(&req);
        assert!(prompt.contains("USER'S WRITING STYLE REFERENCE:\n1. \"kept\""));
    }

    #[test]
    fn test_long_form_requirements() {
        let prompt = PromptBuilder::build(&request(Platform::Reddit));
        assert!(prompt.contains("compose Reddit comments"));
        assert!(
            prompt.contains("may span multiple paragraphs but MUST stay under 10000 characters")
        );
        assert!(prompt.contains("further paragraphs of the same reply"));
    }

    #[test]
    fn test_example_lines_follow_candidate_count() {
        let one = GenerationRequest::new("hi", Tone::Match, Platform::Generic, 1);
        let prompt = PromptBuilder::build(&one);
        assert!(prompt.contains("1. [First reply option]"));
        assert!(!prompt.contains("2. [Second reply option]"));

        let five = GenerationRequest::new("hi", Tone::Match, Platform::Generic, 5);
        let prompt = PromptBuilder::build(&five);
        assert!(prompt.contains("numbered 1-5"));
        assert!(prompt.contains("3. [Third reply option]"));
    }

    #[test]
    fn test_system_prompt_per_platform() {
        assert!(PromptBuilder::system_prompt(Platform::Twitter).contains("Twitter/X replies"));
        assert!(PromptBuilder::system_prompt(Platform::Reddit).contains("Reddit comments"));
        assert!(
            PromptBuilder::system_prompt(Platform::Generic)
                .ends_with("return only the numbered replies.")
        );
    }
}
