//! Correction runner — drives mask → normalise → provider → unmask.
//!
//! # Flow
//!
//! ```text
//! session text
//!   └─▶ mask_code_blocks            (code → [[[CODE_BLOCK_n]]])
//!         └─▶ normalize_whitespace
//!               └─▶ llm.suggest (async)
//!                     ├─ Ok            → unmask corrected + translation
//!                     ├─ config error  → SessionError::Configuration
//!                     └─ other error   → warn, zero suggestions
//! ```
//!
//! Batch mode runs the same unit over every blank-line separated segment,
//! one after the other, and keeps a segment as is when the provider has
//! nothing for it.  Code blocks are masked before the document is split,
//! so a blank line inside a fence never cuts a block in two.

use std::sync::Arc;

use thiserror::Error;

use crate::config::CorrectionConfig;
use crate::document::{join_segments, split_segments, FormatError};
use crate::llm::{CorrectionRequest, LlmCorrector, LlmError, PreserveTerms, Suggestion};
use crate::text::{mask_code_blocks, normalize_whitespace, unmask_code_blocks, BlockMap};

use super::state::Session;

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Errors the user has to act on.
///
/// Provider hiccups are not among them: those degrade to zero suggestions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The provider is not usable as configured (e.g. no API key).
    #[error("{0}")]
    Configuration(#[source] LlmError),

    /// Reading or writing a document failed.
    #[error(transparent)]
    Format(#[from] FormatError),
}

// ---------------------------------------------------------------------------
// BatchOutcome
// ---------------------------------------------------------------------------

/// Result for one batch segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOutcome {
    pub original: String,
    pub corrected: String,
    /// `false` when the provider had no usable suggestion and the segment
    /// was kept unchanged.
    pub from_provider: bool,
}

/// Result of a batch run, segments in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub segments: Vec<SegmentOutcome>,
}

impl BatchOutcome {
    /// The corrected document, segments separated by blank lines.
    pub fn document(&self) -> String {
        let corrected: Vec<&str> = self.segments.iter().map(|s| s.corrected.as_str()).collect();
        join_segments(&corrected)
    }

    /// Segments kept unchanged because the provider returned nothing.
    pub fn fallback_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.from_provider).count()
    }
}

// ---------------------------------------------------------------------------
// Preparation
// ---------------------------------------------------------------------------

/// Mask code blocks and normalise whitespace: the text a provider sees.
pub fn prepare_text(text: &str) -> (String, BlockMap) {
    let (masked, blocks) = mask_code_blocks(text);
    (normalize_whitespace(&masked), blocks)
}

// ---------------------------------------------------------------------------
// CorrectionRunner
// ---------------------------------------------------------------------------

/// Runs correction requests on behalf of a [`Session`].
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use autocorrect::config::AppConfig;
/// use autocorrect::llm::ApiCorrector;
/// use autocorrect::session::{CorrectionRunner, Session};
///
/// # async fn example() -> Result<(), autocorrect::session::SessionError> {
/// let config = AppConfig::default().with_resolved_api_key();
/// let runner = CorrectionRunner::new(Arc::new(ApiCorrector::from_config(&config.llm)));
///
/// let mut session = Session::new("i has a apple");
/// session.rebuild_terms(&config.correction, &[]);
/// runner.run_analysis(&mut session, &config.correction).await?;
///
/// if let Some(review) = session.review(0) {
///     let revised = review.merged();
///     session.apply(revised);
/// }
/// # Ok(())
/// # }
/// ```
pub struct CorrectionRunner {
    llm: Arc<dyn LlmCorrector>,
}

impl CorrectionRunner {
    /// * `llm` — any corrector (e.g. `ApiCorrector` or `FallbackCorrector`).
    pub fn new(llm: Arc<dyn LlmCorrector>) -> Self {
        Self { llm }
    }

    /// Ask for suggestions on the session's text and store them.
    ///
    /// Blank text yields no suggestions without calling the provider.
    pub async fn run_analysis<'s>(
        &self,
        session: &'s mut Session,
        prefs: &CorrectionConfig,
    ) -> Result<&'s [Suggestion], SessionError> {
        let template = CorrectionRequest::from_config("", prefs, session.preserve_terms());
        let suggestions = self.correct(session.text(), &template).await?;
        session.set_suggestions(suggestions);
        Ok(session.suggestions())
    }

    /// One correction unit: mask, normalise, ask, unmask.
    ///
    /// `template` supplies every preference; its `text` is replaced.
    pub async fn correct(
        &self,
        text: &str,
        template: &CorrectionRequest,
    ) -> Result<Vec<Suggestion>, SessionError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let (prepared, blocks) = prepare_text(text);
        log::debug!(
            "Requesting corrections: {} chars, {} code block(s)",
            prepared.len(),
            blocks.len()
        );

        let request = template.with_text(prepared);
        let mut suggestions = match self.llm.suggest(&request).await {
            Ok(suggestions) => suggestions,
            Err(err) if err.is_configuration() => {
                log::error!("Correction unavailable: {err}");
                return Err(SessionError::Configuration(err));
            }
            Err(err) => {
                log::warn!("Correction failed ({err}); no suggestions");
                Vec::new()
            }
        };

        for suggestion in &mut suggestions {
            suggestion.corrected = unmask_code_blocks(&suggestion.corrected, &blocks);
            if let Some(translation) = suggestion.translation.as_mut() {
                *translation = unmask_code_blocks(translation, &blocks);
            }
        }

        Ok(suggestions)
    }

    /// Correct a whole document segment by segment.
    ///
    /// Segments are blank-line separated runs of text outside code blocks.
    /// Each gets a single suggestion without explanations or translation.
    /// A segment whose suggestion is missing or blank is kept as it was.
    pub async fn correct_batch(
        &self,
        document: &str,
        prefs: &CorrectionConfig,
        preserve_terms: &PreserveTerms,
    ) -> Result<BatchOutcome, SessionError> {
        let mut template = CorrectionRequest::from_config("", prefs, preserve_terms);
        template.explain = false;
        template.translate = false;
        template.suggestion_count = 1;

        let (masked, blocks) = mask_code_blocks(document);
        let segments: Vec<String> = split_segments(&masked)
            .into_iter()
            .map(|segment| unmask_code_blocks(segment, &blocks))
            .collect();
        log::info!("Batch correction: {} segment(s)", segments.len());

        let mut outcome = BatchOutcome::default();
        for (i, segment) in segments.into_iter().enumerate() {
            let suggestion = self
                .correct(&segment, &template)
                .await?
                .into_iter()
                .next()
                .filter(Suggestion::has_text);

            let (corrected, from_provider) = match suggestion {
                Some(s) => (s.corrected, true),
                None => {
                    log::warn!("Segment {} kept unchanged", i + 1);
                    (segment.clone(), false)
                }
            };

            outcome.segments.push(SegmentOutcome {
                original: segment,
                corrected,
                from_provider,
            });
        }

        Ok(outcome)
    }

    /// Name the language of `text` (`"Auto"` if the provider cannot say).
    pub async fn detect_language(&self, text: &str) -> Result<String, SessionError> {
        match self.llm.detect_language(text).await {
            Ok(language) => Ok(language),
            Err(err) if err.is_configuration() => Err(SessionError::Configuration(err)),
            Err(err) => {
                log::warn!("Language detection failed ({err})");
                Ok("Auto".to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
