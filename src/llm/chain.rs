//! Ordered model fallback.
//!
//! Hosted models come and go by region and quota, so a request is tried
//! against each configured model in turn.  The first success wins; when
//! every model fails the last error is kept for diagnosis.

use std::future::Future;

use crate::llm::corrector::LlmError;

/// Ordered list of model identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelChain {
    models: Vec<String>,
}

impl ModelChain {
    /// Build a chain; blank identifiers are dropped.
    pub fn new<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let models = models
            .into_iter()
            .map(Into::into)
            .map(|m: String| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        Self { models }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Call `attempt` with each model until one succeeds.
    ///
    /// Configuration errors stop the chain immediately: no other model
    /// would fare better.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, LlmError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut last = None;
        let mut attempts = 0;

        for model in &self.models {
            attempts += 1;
            match attempt(model.clone()).await {
                Ok(value) => {
                    if attempts > 1 {
                        log::info!("Model {model} succeeded after {} failure(s)", attempts - 1);
                    }
                    return Ok(value);
                }
                Err(err) if err.is_configuration() => return Err(err),
                Err(err) => {
                    log::warn!("Model {model} failed: {err}");
                    last = Some(err);
                }
            }
        }

        match last {
            Some(last) => Err(LlmError::AllModelsFailed {
                attempts,
                last: Box::new(last),
            }),
            None => Err(LlmError::NoModels),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
