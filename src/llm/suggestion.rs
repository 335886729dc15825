//! Corrected variants returned by a provider.

use serde::{Deserialize, Serialize};

/// Confidence given to suggestions whose provider omitted or garbled one.
pub const DEFAULT_CONFIDENCE: f32 = 0.7;

/// One fragment-level change the provider reports having made.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub before: String,
    pub after: String,
    pub reason: String,
}

/// A full corrected version of the submitted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The whole corrected text.
    pub corrected: String,
    /// Overall confidence, always within `0.0..=1.0`.
    pub confidence: f32,
    pub explanations: Vec<Explanation>,
    /// Language name as detected by the provider.
    pub language: String,
    /// English translation of `corrected`, when requested and supplied.
    pub translation: Option<String>,
}

impl Suggestion {
    /// Wrap unstructured provider output as a single suggestion.
    pub fn raw(text: &str, language: &str) -> Self {
        Self {
            corrected: text.trim().to_string(),
            confidence: DEFAULT_CONFIDENCE,
            explanations: Vec::new(),
            language: language.to_string(),
            translation: None,
        }
    }

    /// Confidence as a whole percentage, for display.
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    pub fn has_text(&self) -> bool {
        !self.corrected.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_suggestion_trims_and_uses_default_confidence() {
        let s = Suggestion::raw("  Fixed text.\n", "English");
        assert_eq!(s.corrected, "Fixed text.");
        assert_eq!(s.confidence, DEFAULT_CONFIDENCE);
        assert!(s.explanations.is_empty());
        assert_eq!(s.language, "English");
        assert!(s.translation.is_none());
    }

    #[test]
    fn confidence_percent_rounds() {
        let mut s = Suggestion::raw("x", "Auto");
        s.confidence = 0.876;
        assert_eq!(s.confidence_percent(), 88);
        s.confidence = 1.0;
        assert_eq!(s.confidence_percent(), 100);
    }

    #[test]
    fn blank_correction_has_no_text() {
        assert!(!Suggestion::raw("   ", "Auto").has_text());
        assert!(Suggestion::raw("ok", "Auto").has_text());
    }
}
