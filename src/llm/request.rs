//! What gets sent to a provider: the text plus correction preferences.

use crate::config::{CorrectionConfig, DomainMode, StyleMode};
use crate::llm::dictionary::Dictionary;
use crate::llm::terms::PreserveTerms;

/// A single correction request.
///
/// `text` is expected to be masked and normalised already; the provider
/// never sees raw code blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionRequest {
    pub text: String,
    /// Language name, or `"Auto"` to let the provider decide.
    pub language: String,
    pub domain_mode: DomainMode,
    pub style: StyleMode,
    pub preserve_terms: PreserveTerms,
    pub dictionary_tags: Vec<Dictionary>,
    pub explain: bool,
    pub translate: bool,
    /// Number of distinct suggestions to ask for (1–3).
    pub suggestion_count: u8,
    /// Sampling temperature (0.0–1.0).
    pub temperature: f32,
}

impl CorrectionRequest {
    /// Request for `text` with default preferences and no preserve terms.
    pub fn new(text: impl Into<String>) -> Self {
        Self::from_config(text, &CorrectionConfig::default(), &PreserveTerms::new())
    }

    /// Request for `text` using the preferences in `config`.
    ///
    /// Out-of-range counts and temperatures are clamped here.
    pub fn from_config(
        text: impl Into<String>,
        config: &CorrectionConfig,
        preserve_terms: &PreserveTerms,
    ) -> Self {
        Self {
            text: text.into(),
            language: config.language.clone(),
            domain_mode: config.domain_mode,
            style: config.style,
            preserve_terms: preserve_terms.clone(),
            dictionary_tags: config.dictionaries.clone(),
            explain: config.explain,
            translate: config.translate,
            suggestion_count: config.suggestion_count(),
            temperature: config.temperature(),
        }
    }

    /// Same preferences, different text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// The requested language, `"Auto"` when unset.
    pub fn requested_language(&self) -> &str {
        let language = self.language.trim();
        if language.is_empty() {
            "Auto"
        } else {
            language
        }
    }

    /// `true` when the caller named a concrete language.
    pub fn has_explicit_language(&self) -> bool {
        !self.requested_language().eq_ignore_ascii_case("auto")
    }
}
