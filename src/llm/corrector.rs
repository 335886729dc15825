//! Core `LlmCorrector` trait and `ApiCorrector` implementation.
//!
//! `ApiCorrector` calls any OpenAI-compatible `/chat/completions` endpoint:
//! Gemini's OpenAI mode (default), OpenAI, Groq, Ollama, LM Studio, etc.
//! All connection details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::LlmConfig;
use crate::llm::chain::ModelChain;
use crate::llm::parse::parse_suggestions;
use crate::llm::prompt::{language_detection_prompt, PromptBuilder};
use crate::llm::request::CorrectionRequest;
use crate::llm::suggestion::Suggestion;

/// Nucleus sampling bound sent with every request.
const TOP_P: f32 = 0.9;

/// Longest error body kept in [`LlmError::Status`].
const MAX_ERROR_BODY: usize = 512;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while asking a provider for corrections.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key in the config or the environment.
    #[error("API key missing; set llm.api_key in settings.toml or GOOGLE_API_KEY")]
    MissingApiKey,

    /// The model chain is empty.
    #[error("no models configured")]
    NoModels,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("LLM endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The LLM returned a response with no usable text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,

    /// Every model in the chain failed.
    #[error("all {attempts} model(s) failed; last error: {last}")]
    AllModelsFailed {
        attempts: usize,
        #[source]
        last: Box<LlmError>,
    },
}

impl LlmError {
    /// `true` for errors that retrying or switching models cannot fix.
    pub fn is_configuration(&self) -> bool {
        matches!(self, LlmError::MissingApiKey | LlmError::NoModels)
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// LlmCorrector trait
// ---------------------------------------------------------------------------

/// Async trait for LLM-based text correction.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn LlmCorrector>`).
#[async_trait]
pub trait LlmCorrector: Send + Sync {
    /// Ask for corrected variants of `request.text`.
    async fn suggest(&self, request: &CorrectionRequest) -> Result<Vec<Suggestion>, LlmError>;

    /// Name the language `text` is written in.
    async fn detect_language(&self, text: &str) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiCorrector
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/chat/completions` endpoint, trying each
/// configured model in order.
pub struct ApiCorrector {
    client: reqwest::Client,
    config: LlmConfig,
    chain: ModelChain,
}

impl ApiCorrector {
    /// Build an `ApiCorrector` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            chain: ModelChain::new(config.models.iter().cloned()),
        }
    }

    pub fn chain(&self) -> &ModelChain {
        &self.chain
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        match self.config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(LlmError::MissingApiKey),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Run one chat completion, falling through the model chain.
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String, LlmError> {
        let key = self.api_key()?;
        self.chain
            .run(|model| self.complete_with(model, key, system, user, temperature))
            .await
    }

    async fn complete_with(
        &self,
        model: String,
        key: &str,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model":       model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user",   "content": user   }
            ],
            "stream":      false,
            "temperature": temperature,
            "top_p":       TOP_P,
            "max_tokens":  self.config.max_tokens
        });

        log::debug!("POST {} (model={model})", self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), body));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        content_from(&json)
    }
}

/// `LlmError::Status` with the body cut to [`MAX_ERROR_BODY`] bytes on a
/// char boundary.
fn status_error(status: u16, mut body: String) -> LlmError {
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    LlmError::Status { status, body }
}

/// The trimmed `choices[0].message.content` of a chat completion.
fn content_from(json: &serde_json::Value) -> Result<String, LlmError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(LlmError::EmptyResponse)?
        .trim();

    if content.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(content.to_string())
}

#[async_trait]
impl LlmCorrector for ApiCorrector {
    async fn suggest(&self, request: &CorrectionRequest) -> Result<Vec<Suggestion>, LlmError> {
        let (system, user) = PromptBuilder::new(request).build_chat();
        let temperature = request.temperature.clamp(0.0, 1.0);

        let raw = self.complete(&system, &user, temperature).await?;
        let suggestions = parse_suggestions(&raw, request.requested_language());

        log::debug!("Provider returned {} suggestion(s)", suggestions.len());
        Ok(suggestions)
    }

    async fn detect_language(&self, text: &str) -> Result<String, LlmError> {
        let (system, user) = language_detection_prompt(text);
        let raw = self.complete(&system, &user, 0.0).await?;

        raw.lines()
            .map(|line| line.trim().trim_matches(|c: char| c == '.' || c == '"'))
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or(LlmError::EmptyResponse)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            base_url: "http://localhost:11434/v1/".into(),
            api_key: api_key.map(|s| s.to_string()),
            models: vec!["qwen2.5:3b".into(), "llama3.2".into()],
            max_tokens: 768,
            timeout_secs: 10,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let corrector = ApiCorrector::from_config(&make_config(None));
        assert_eq!(corrector.chain().models(), ["qwen2.5:3b", "llama3.2"]);
    }

    #[test]
    fn endpoint_has_single_slash() {
        let corrector = ApiCorrector::from_config(&make_config(None));
        assert_eq!(corrector.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn api_key_required() {
        for key in [None, Some(""), Some("   ")] {
            let corrector = ApiCorrector::from_config(&make_config(key));
            assert!(matches!(corrector.api_key(), Err(LlmError::MissingApiKey)));
        }
        let corrector = ApiCorrector::from_config(&make_config(Some("sk-test-1234")));
        assert_eq!(corrector.api_key().unwrap(), "sk-test-1234");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let corrector = ApiCorrector::from_config(&make_config(None));
        let err = corrector
            .suggest(&CorrectionRequest::new("text"))
            .await
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[test]
    fn configuration_errors() {
        assert!(LlmError::MissingApiKey.is_configuration());
        assert!(LlmError::NoModels.is_configuration());
        assert!(!LlmError::Timeout.is_configuration());
        assert!(!LlmError::AllModelsFailed {
            attempts: 1,
            last: Box::new(LlmError::EmptyResponse),
        }
        .is_configuration());
    }

    #[test]
    fn all_models_failed_message_names_last_error() {
        let err = LlmError::AllModelsFailed {
            attempts: 3,
            last: Box::new(LlmError::Timeout),
        };
        assert_eq!(
            err.to_string(),
            "all 3 model(s) failed; last error: LLM request timed out"
        );
    }

    /// Verify that `ApiCorrector` is object-safe (usable as `dyn LlmCorrector`).
    #[test]
    fn corrector_is_object_safe() {
        let corrector: Box<dyn LlmCorrector> =
            Box::new(ApiCorrector::from_config(&make_config(None)));
        drop(corrector);
    }

    #[test]
    fn content_is_read_from_first_choice() {
        let json = serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  [{\"corrected\": \"Hi\"}]\n" } },
                { "message": { "content": "second" } }
            ]
        });
        assert_eq!(content_from(&json).unwrap(), r#"[{"corrected": "Hi"}]"#);
    }

    #[test]
    fn blank_content_is_empty_response() {
        let json = serde_json::json!({ "choices": [{ "message": { "content": " \n " } }] });
        assert!(matches!(content_from(&json), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn missing_content_is_empty_response() {
        for json in [
            serde_json::json!({}),
            serde_json::json!({ "choices": [] }),
            serde_json::json!({ "choices": [{ "message": {} }] }),
            serde_json::json!({ "error": { "message": "quota" } }),
        ] {
            assert!(matches!(content_from(&json), Err(LlmError::EmptyResponse)));
        }
    }

    #[test]
    fn non_string_content_is_empty_response() {
        let json = serde_json::json!({ "choices": [{ "message": { "content": 42 } }] });
        assert!(matches!(content_from(&json), Err(LlmError::EmptyResponse)));
        let json = serde_json::json!({ "choices": [{ "message": { "content": null } }] });
        assert!(matches!(content_from(&json), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn short_status_body_is_kept() {
        match status_error(429, "rate limited".into()) {
            LlmError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn long_status_body_is_cut_on_char_boundary() {
        // 'é' is two bytes, so byte MAX_ERROR_BODY falls inside a char.
        let body = format!("x{}", "é".repeat(MAX_ERROR_BODY));
        match status_error(500, body) {
            LlmError::Status { body, .. } => {
                assert_eq!(body.len(), MAX_ERROR_BODY - 1);
                assert!(body.starts_with('x'));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
