//! Candidate parser: raw model text in, bounded list of replies out.
//!
//! The model is asked to answer with a numbered list. The primary pass scans
//! line by line: a `N.` or `N)` marker opens a new candidate, and non-blank
//! lines that follow are continuation lines of the same candidate (long-form
//! platforms produce multi-paragraph replies this way). Only when that pass
//! yields nothing at all does the parser fall back to splitting on blank
//! lines.
//!
//! Over-long candidates are dropped, never truncated.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use replyforge_types::candidate::Candidate;

/// A numbered marker line: `1. text`, `2) text`, or a bare `3.`.
static MARKER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[.)]\s*(.*)$").expect("marker pattern is valid"));

/// A numbered marker at the start of a paragraph (fallback pass).
static LEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s*").expect("leading marker pattern is valid"));

/// Two or more consecutive newlines.
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("paragraph pattern is valid"));

/// Parse raw model output into at most `num_candidates` candidates, each at
/// most `max_length` characters long.
///
/// Returns fewer candidates than requested (possibly none) when the output
/// does not contain enough acceptable replies. Pure: the same input always
/// yields the same result.
pub fn parse_candidates(raw: &str, num_candidates: usize, max_length: usize) -> Vec<Candidate> {
    let text = raw.replace("\r\n", "\n");

    let mut candidates = scan_numbered(&text, max_length);
    if candidates.is_empty() {
        candidates = split_paragraphs(&text, max_length);
    }

    candidates.truncate(num_candidates);
    candidates
}

/// Primary pass: numbered markers open candidates, non-blank lines continue them.
fn scan_numbered(text: &str, max_length: usize) -> Vec<Candidate> {
    let mut accepted = Vec::new();
    let mut buffer: Option<String> = None;

    for line in text.split('\n') {
        if let Some(caps) = MARKER_LINE.captures(line) {
            if let Some(previous) = buffer.take() {
                accepted.extend(finalize(&previous, max_length));
            }
            let first = caps.get(2).map_or("", |m| m.as_str());
            buffer = Some(first.to_string());
        } else if let Some(current) = buffer.as_mut() {
            if !line.trim().is_empty() {
                current.push('\n');
                current.push_str(line);
            }
        }
    }

    if let Some(last) = buffer {
        accepted.extend(finalize(&last, max_length));
    }

    accepted
}

/// Trim, length-check, and unquote a finished candidate buffer.
fn finalize(buffer: &str, max_length: usize) -> Option<Candidate> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return None;
    }

    let length = trimmed.chars().count();
    if length > max_length {
        debug!(length, max_length, "dropping over-long candidate");
        return None;
    }

    Candidate::new(strip_surrounding_quotes(trimmed).trim())
}

/// Fallback pass: blank-line separated paragraphs, leading marker removed.
fn split_paragraphs(text: &str, max_length: usize) -> Vec<Candidate> {
    PARAGRAPH_BREAK
        .split(text)
        .filter_map(|paragraph| {
            let stripped = LEADING_MARKER.replace(paragraph, "");
            let trimmed = stripped.trim();
            if trimmed.chars().count() > max_length {
                debug!(max_length, "dropping over-long paragraph");
                return None;
            }
            Candidate::new(trimmed)
        })
        .collect()
}

/// Remove one matching pair of `"` or `'` around the text, if present.
fn strip_surrounding_quotes(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && (first == '"' || first == '\'') => {
            // Both quote characters are single-byte ASCII.
            &text[1..text.len() - 1]
        }
        _ => text,
    }
}
