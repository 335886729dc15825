//! Prompt builder for grammar and style correction.
//!
//! [`PromptBuilder`] renders a [`CorrectionRequest`] in two shapes:
//! * **Flat** (`build`) — a single string.
//! * **Chat** (`build_chat`) — `(system_msg, user_msg)` tuple for any
//!   OpenAI-compatible `/chat/completions` endpoint.
//!
//! Sections always appear in the same order (role, language, domain and
//! style, preserve terms, dictionaries, tasks, response format, text), so
//! identical requests produce identical prompts.

use crate::config::{DomainMode, StyleMode};
use crate::llm::request::CorrectionRequest;

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

const SYSTEM_INSTRUCTION: &str = "You are an expert copy editor.";

fn domain_instruction(mode: DomainMode) -> &'static str {
    match mode {
        DomainMode::General => "Use clear, natural English suitable for general audiences.",
        DomainMode::Academic => {
            "Use formal academic tone, precise vocabulary, and clear structure."
        }
        DomainMode::Business => "Use professional, concise, and polite business email style.",
        DomainMode::CodeComments => {
            "Do not change code syntax. Improve surrounding prose/comments; keep technical accuracy."
        }
    }
}

fn style_instruction(style: StyleMode) -> &'static str {
    match style {
        StyleMode::Neutral => "Keep the style neutral.",
        StyleMode::Casual => "Use a conversational, approachable tone.",
        StyleMode::Formal => "Use a formal, professional tone.",
        StyleMode::Persuasive => "Strengthen rhetorical clarity and persuasive impact.",
        StyleMode::Concise => "Reduce verbosity; keep sentences short and direct.",
    }
}

const RESPONSE_FORMAT: &str = "\
RESPONSE FORMAT (MANDATORY):
Return a single JSON array where each item is an object with the keys above.
Do not include any commentary outside the JSON.";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds correction prompts in either flat or chat-message format.
///
/// # Example
/// ```rust
/// use autocorrect::llm::{CorrectionRequest, PromptBuilder};
///
/// let request = CorrectionRequest::new("i has a apple");
/// let (system, user) = PromptBuilder::new(&request).build_chat();
/// assert!(system.contains("copy editor"));
/// assert!(user.ends_with("i has a apple"));
/// ```
pub struct PromptBuilder<'a> {
    request: &'a CorrectionRequest,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(request: &'a CorrectionRequest) -> Self {
        Self { request }
    }

    /// Build a **flat** prompt string: system instruction, blank line,
    /// then the user message.
    pub fn build(&self) -> String {
        let (system, user) = self.build_chat();
        format!("{system}\n\n{user}")
    }

    /// Build a **(system_msg, user_msg)** pair.
    pub fn build_chat(&self) -> (String, String) {
        let req = self.request;
        let mut user = String::with_capacity(1024 + req.text.len());

        if req.has_explicit_language() {
            user.push_str(&format!(
                "Assume the text is in {}. ",
                req.requested_language()
            ));
        }
        user.push_str(domain_instruction(req.domain_mode));
        user.push(' ');
        user.push_str(style_instruction(req.style));
        user.push('\n');

        if !req.preserve_terms.is_empty() {
            let terms: Vec<&str> = req.preserve_terms.iter().collect();
            user.push_str(&format!(
                "Preserve these terms exactly (spelling/casing unchanged): {}.\n",
                terms.join(", ")
            ));
        }

        if !req.dictionary_tags.is_empty() {
            let tags: Vec<&str> = req.dictionary_tags.iter().map(|d| d.label()).collect();
            user.push_str(&format!(
                "Respect specialized terminology for these domains: {}. \
                 Do not 'correct' legitimate terms in these domains.\n",
                tags.join(", ")
            ));
        }

        user.push('\n');
        user.push_str(&self.tasks());
        user.push('\n');
        user.push_str(RESPONSE_FORMAT);
        user.push_str("\n\nTEXT TO CORRECT:\n");
        user.push_str(&req.text);

        (SYSTEM_INSTRUCTION.to_string(), user)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn tasks(&self) -> String {
        let req = self.request;
        let count = req.suggestion_count.clamp(1, 3);

        let mut tasks = String::from(
            "TASKS:\n\
             1) Correct grammar, spelling, punctuation, and fluency.\n\
             2) Keep meaning intact and avoid changing any terms listed to preserve.\n\
             3) Code has been replaced by placeholders such as [[[CODE_BLOCK_0]]]. \
             Copy every placeholder through unchanged and only improve the surrounding prose.\n",
        );
        tasks.push_str(&format!("4) Return {count} distinct suggestions.\n"));
        tasks.push_str(
            "5) For each suggestion, include:\n   \
             - \"corrected\": the full corrected text (same language as input unless told otherwise),\n   \
             - \"confidence\": a float from 0.0 to 1.0 for how confident you are overall,\n",
        );
        if req.explain {
            tasks.push_str(
                "   - \"explanations\": a list of objects with fields:\n       \
                 * \"before\": the original fragment\n       \
                 * \"after\": the corrected fragment\n       \
                 * \"reason\": a short explanation\n",
            );
        } else {
            tasks.push_str("   - \"explanations\": an empty list\n");
        }
        tasks.push_str("   - \"language\": the detected language name\n");
        if req.translate {
            tasks.push_str(
                "   - \"translation_en\": the English translation of the corrected text\n",
            );
        }
        tasks
    }
}

/// `(system_msg, user_msg)` asking for the language name only.
pub fn language_detection_prompt(text: &str) -> (String, String) {
    (
        "You identify languages.".to_string(),
        format!("Detect the language of this text and reply with language name only:\n{text}"),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
