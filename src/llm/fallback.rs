//! Fallback corrector — wraps any [`LlmCorrector`] and degrades to "no
//! suggestions" on provider failure.
//!
//! When the underlying call fails for a provider reason (`Request`,
//! `Timeout`, `Status`, `Parse`, `EmptyResponse`, `AllModelsFailed`)
//! [`FallbackCorrector`] logs a warning and returns an empty list, so the
//! caller keeps the user's text as is.  Configuration errors (missing key,
//! empty model list) still propagate: the user has to fix those.

use async_trait::async_trait;

use crate::llm::corrector::{LlmCorrector, LlmError};
use crate::llm::request::CorrectionRequest;
use crate::llm::suggestion::Suggestion;

/// Language reported when detection fails.
const UNKNOWN_LANGUAGE: &str = "Auto";

// ---------------------------------------------------------------------------
// FallbackCorrector
// ---------------------------------------------------------------------------

/// A transparent wrapper around any [`LlmCorrector`] that turns provider
/// failures into empty results.
///
/// # Example
/// ```rust
/// use autocorrect::config::LlmConfig;
/// use autocorrect::llm::{ApiCorrector, FallbackCorrector};
///
/// let inner = ApiCorrector::from_config(&LlmConfig::default());
/// let corrector = FallbackCorrector::new(inner);
/// // `corrector` now implements LlmCorrector and keeps working even when
/// // the API is unreachable.
/// ```
pub struct FallbackCorrector<C: LlmCorrector> {
    inner: C,
}

impl<C: LlmCorrector> FallbackCorrector<C> {
    /// Wrap `inner` with fallback behaviour.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Return a reference to the wrapped corrector.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: LlmCorrector + Send + Sync> LlmCorrector for FallbackCorrector<C> {
    /// Ask the inner corrector; return `Ok(vec![])` on provider errors.
    async fn suggest(&self, request: &CorrectionRequest) -> Result<Vec<Suggestion>, LlmError> {
        match self.inner.suggest(request).await {
            Ok(suggestions) => Ok(suggestions),
            Err(err) if err.is_configuration() => Err(err),
            Err(err) => {
                log::warn!(
                    "LLM correction failed ({err}); no suggestions (len={})",
                    request.text.len()
                );
                Ok(Vec::new())
            }
        }
    }

    /// Ask the inner corrector; return `"Auto"` on provider errors.
    async fn detect_language(&self, text: &str) -> Result<String, LlmError> {
        match self.inner.detect_language(text).await {
            Ok(language) => Ok(language),
            Err(err) if err.is_configuration() => Err(err),
            Err(err) => {
                log::warn!("Language detection failed ({err}); assuming {UNKNOWN_LANGUAGE}");
                Ok(UNKNOWN_LANGUAGE.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
