//! The input contract for prompt building and the model call.

use serde::{Deserialize, Serialize};

use crate::candidate::{Platform, Tone};

/// Maximum number of image references forwarded with a request.
pub const MAX_IMAGE_REFS: usize = 4;

/// Maximum number of style samples injected into a prompt.
pub const MAX_STYLE_SAMPLES: usize = 5;

/// Everything needed to build a prompt and interpret the model's answer.
///
/// All fields are required; adapting this record to a vendor's wire schema
/// is the provider implementation's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The post or page content being replied to. May be empty.
    pub original_content: String,
    pub tone: Tone,
    pub platform: Platform,
    /// Free-text refinement from the user ("make it funnier"). Empty for the
    /// bootstrap generation.
    pub feedback_instruction: String,
    /// Number of candidates to ask for (at least 1).
    pub num_candidates: usize,
    /// Image URLs attached to the original content (at most [`MAX_IMAGE_REFS`]).
    pub image_refs: Vec<String>,
    /// Prose rendering of earlier turns in the conversation.
    pub prior_conversation_summary: String,
    /// The user's own previous posts, used as a style reference.
    pub style_samples: Vec<String>,
}

impl GenerationRequest {
    /// Create a request with the invariants applied: `num_candidates` is at
    /// least 1, images are capped at [`MAX_IMAGE_REFS`], and style samples at
    /// [`MAX_STYLE_SAMPLES`].
    pub fn new(
        original_content: impl Into<String>,
        tone: Tone,
        platform: Platform,
        num_candidates: usize,
    ) -> Self {
        Self {
            original_content: original_content.into(),
            tone,
            platform,
            feedback_instruction: String::new(),
            num_candidates: num_candidates.max(1),
            image_refs: Vec::new(),
            prior_conversation_summary: String::new(),
            style_samples: Vec::new(),
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback_instruction = feedback.into();
        self
    }

    pub fn with_images(mut self, mut image_refs: Vec<String>) -> Self {
        image_refs.truncate(MAX_IMAGE_REFS);
        self.image_refs = image_refs;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.prior_conversation_summary = summary.into();
        self
    }

    pub fn with_style_samples(mut self, mut samples: Vec<String>) -> Self {
        samples.truncate(MAX_STYLE_SAMPLES);
        self.style_samples = samples;
        self
    }

    pub fn has_images(&self) -> bool {
        !self.image_refs.is_empty()
    }

    /// Reply length ceiling for the target platform.
    pub fn max_length(&self) -> usize {
        self.platform.max_reply_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_candidates_floor() {
        let req = GenerationRequest::new("hi", Tone::Match, Platform::Twitter, 0);
        assert_eq!(req.num_candidates, 1);
    }

    #[test]
    fn test_images_capped() {
        let images = (0..7).map(|i| format!("https://img.example/{i}.png")).collect();
        let req =
            GenerationRequest::new("hi", Tone::Match, Platform::Twitter, 3).with_images(images);
        assert_eq!(req.image_refs.len(), MAX_IMAGE_REFS);
        assert!(req.has_images());
        assert_eq!(req.image_refs[3], "https://img.example/3.png");
    }

    #[test]
    fn test_style_samples_capped() {
        let samples = (0..9).map(|i| format!("post {i}")).collect();
        let req = GenerationRequest::new("", Tone::Match, Platform::Reddit, 3)
            .with_style_samples(samples);
        assert_eq!(req.style_samples.len(), MAX_STYLE_SAMPLES);
        assert_eq!(req.max_length(), 10_000);
    }
}
