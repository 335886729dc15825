//! External correction provider.
//!
//! This module provides:
//! * [`LlmCorrector`] — async trait implemented by all corrector backends.
//! * [`ApiCorrector`] — OpenAI-compatible REST API corrector.
//! * [`ModelChain`] — ordered model fallback used by `ApiCorrector`.
//! * [`FallbackCorrector`] — wraps any corrector; no suggestions on failure.
//! * [`PromptBuilder`] — renders a [`CorrectionRequest`] as a prompt.
//! * [`parse_suggestions`] — tolerant parsing of provider output.
//! * [`PreserveTerms`] / [`Dictionary`] — terms the provider must not touch.
//! * [`LlmError`] — error variants for provider operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use autocorrect::config::AppConfig;
//! use autocorrect::llm::{ApiCorrector, CorrectionRequest, FallbackCorrector, LlmCorrector};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default().with_resolved_api_key();
//!
//!     // Provider failures degrade to an empty list.
//!     let corrector = FallbackCorrector::new(ApiCorrector::from_config(&config.llm));
//!
//!     let request = CorrectionRequest::new("i has a apple");
//!     for suggestion in corrector.suggest(&request).await.unwrap() {
//!         println!("{} ({}%)", suggestion.corrected, suggestion.confidence_percent());
//!     }
//! }
//! ```

pub mod chain;
pub mod corrector;
pub mod dictionary;
pub mod fallback;
pub mod parse;
pub mod prompt;
pub mod request;
pub mod suggestion;
pub mod terms;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use chain::ModelChain;
pub use corrector::{ApiCorrector, LlmCorrector, LlmError};
pub use dictionary::Dictionary;
pub use fallback::FallbackCorrector;
pub use parse::{extract_json, parse_suggestions};
pub use prompt::{language_detection_prompt, PromptBuilder};
pub use request::CorrectionRequest;
pub use suggestion::{Explanation, Suggestion, DEFAULT_CONFIDENCE};
pub use terms::{parse_custom_terms, parse_glossary, PreserveTerms};
