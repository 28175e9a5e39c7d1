//! Reply candidates and the platform/tone enums that shape them.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Reply length ceiling for short-form platforms (Twitter/X).
pub const SHORT_FORM_LIMIT: usize = 280;

/// Practical reply length ceiling for long-form platforms.
pub const LONG_FORM_LIMIT: usize = 10_000;

/// A single proposed reply emitted by the model and accepted by the parser.
///
/// Candidates are immutable once created. The text is never empty; the parser
/// drops anything that would produce an empty candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Candidate {
    text: String,
}

impl Candidate {
    /// Wrap a reply string. Returns `None` for empty or whitespace-only text.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters (not bytes), the unit platform limits are expressed in.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl TryFrom<String> for Candidate {
    type Error = String;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Candidate::new(text).ok_or_else(|| "candidate text is empty".to_string())
    }
}

impl From<Candidate> for String {
    fn from(candidate: Candidate) -> Self {
        candidate.text
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Destination the reply will be inserted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Reddit,
    Generic,
}

impl Platform {
    /// Maximum accepted reply length in characters.
    pub fn max_reply_length(&self) -> usize {
        match self {
            Platform::Twitter => SHORT_FORM_LIMIT,
            Platform::Reddit | Platform::Generic => LONG_FORM_LIMIT,
        }
    }

    /// Whether replies may span several paragraphs.
    pub fn is_long_form(&self) -> bool {
        self.max_reply_length() > SHORT_FORM_LIMIT
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Twitter => write!(f, "twitter"),
            Platform::Reddit => write!(f, "reddit"),
            Platform::Generic => write!(f, "generic"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twitter" | "x" => Ok(Platform::Twitter),
            "reddit" => Ok(Platform::Reddit),
            "generic" => Ok(Platform::Generic),
            other => Err(format!("invalid platform: '{other}'")),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Twitter
    }
}

/// Voice the generated replies should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Match the style of the user's own previous posts.
    Match,
    Professional,
    Casual,
    Witty,
    Thoughtful,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Match,
        Tone::Professional,
        Tone::Casual,
        Tone::Witty,
        Tone::Thoughtful,
    ];

    /// Instruction text used in the prompt's `TONE:` line.
    pub fn description(&self) -> &'static str {
        match self {
            Tone::Match => "Match the style and voice of the user's previous posts",
            Tone::Professional => "Professional, polished, and business-appropriate",
            Tone::Casual => "Casual, friendly, and conversational",
            Tone::Witty => "Witty, clever, and humorous (but not trying too hard)",
            Tone::Thoughtful => "Thoughtful, insightful, and adds value to the conversation",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Match => write!(f, "match"),
            Tone::Professional => write!(f, "professional"),
            Tone::Casual => write!(f, "casual"),
            Tone::Witty => write!(f, "witty"),
            Tone::Thoughtful => write!(f, "thoughtful"),
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "match" => Ok(Tone::Match),
            "professional" => Ok(Tone::Professional),
            "casual" => Ok(Tone::Casual),
            "witty" => Ok(Tone::Witty),
            "thoughtful" => Ok(Tone::Thoughtful),
            other => Err(format!("invalid tone: '{other}'")),
        }
    }
}

impl Default for Tone {
    fn default() -> Self {
        Tone::Match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_rejects_blank_text() {
        assert!(Candidate::new("").is_none());
        assert!(Candidate::new("   \n").is_none());
        assert_eq!(Candidate::new("hi").unwrap().text(), "hi");
    }

    #[test]
    fn test_candidate_len_counts_chars() {
        let c = Candidate::new("héllo ✨").unwrap();
        assert_eq!(c.len(), 7);
        assert!(c.text().len() > 7);
    }

    #[test]
    fn test_candidate_serializes_as_plain_string() {
        let c = Candidate::new("Love it!").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"Love it!\"");
    }

    #[test]
    fn test_candidate_deserialize_rejects_blank_text() {
        let c: Candidate = serde_json::from_str("\"Love it!\"").unwrap();
        assert_eq!(c.text(), "Love it!");
        assert!(serde_json::from_str::<Candidate>("\"   \"").is_err());
        assert!(serde_json::from_str::<Candidate>("\"\"").is_err());
    }

    #[test]
    fn test_platform_limits() {
        assert_eq!(Platform::Twitter.max_reply_length(), 280);
        assert_eq!(Platform::Reddit.max_reply_length(), 10_000);
        assert_eq!(Platform::Generic.max_reply_length(), 10_000);
        assert!(!Platform::Twitter.is_long_form());
        assert!(Platform::Reddit.is_long_form());
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!("reddit".parse::<Platform>().unwrap(), Platform::Reddit);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_tone_roundtrip() {
        for tone in Tone::ALL {
            let parsed: Tone = tone.to_string().parse().unwrap();
            assert_eq!(parsed, tone);
        }
    }

    #[test]
    fn test_tone_serde() {
        let json = serde_json::to_string(&Tone::Witty).unwrap();
        assert_eq!(json, "\"witty\"");
        assert_eq!(Tone::default(), Tone::Match);
    }
}
