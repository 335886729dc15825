//! Per-session state: the working text, its history and the last results.
//!
//! A [`Session`] is created when the user starts working and dropped when
//! they finish.  Nothing in it is persisted; settings live in
//! [`crate::config`].
//!
//! ```text
//! set_text ──▶ run_analysis ──▶ suggestions ──review──▶ apply ──▶ history
//!                                                          ▲         │
//!                                                          └─restore─┘
//! ```

use crate::config::CorrectionConfig;
use crate::llm::{PreserveTerms, Suggestion};
use crate::session::review::Review;
use crate::text::Aligner;

/// How many history entries a front end shows.
pub const HISTORY_DISPLAY_LIMIT: usize = 6;

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// One accepted version of the text, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry<'a> {
    pub version: usize,
    pub text: &'a str,
}

/// Append-only list of accepted texts.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `text`; returns its version number.
    pub fn push(&mut self, text: impl Into<String>) -> usize {
        self.entries.push(text.into());
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Text of a 1-based `version`.
    pub fn get(&self, version: usize) -> Option<&str> {
        version
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    pub fn latest(&self) -> Option<HistoryEntry<'_>> {
        self.recent(1).into_iter().next()
    }

    /// Up to `limit` most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry<'_>> {
        self.entries
            .iter()
            .enumerate()
            .rev()
            .take(limit)
            .map(|(i, text)| HistoryEntry {
                version: i + 1,
                text,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Everything one editing session owns.
#[derive(Debug, Clone, Default)]
pub struct Session {
    text: String,
    preserve_terms: PreserveTerms,
    suggestions: Vec<Suggestion>,
    history: History,
}

impl Session {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The current working text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the working text.  Earlier suggestions no longer apply and
    /// are dropped.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.suggestions.clear();
    }

    pub fn preserve_terms(&self) -> &PreserveTerms {
        &self.preserve_terms
    }

    pub fn set_preserve_terms(&mut self, terms: PreserveTerms) {
        self.preserve_terms = terms;
    }

    /// Rebuild the preserve set after a settings change.
    pub fn rebuild_terms(&mut self, prefs: &CorrectionConfig, glossary: &[String]) {
        self.preserve_terms = PreserveTerms::build(&prefs.custom_terms, &prefs.dictionaries, glossary);
        log::debug!("Preserve set rebuilt: {} term(s)", self.preserve_terms.len());
    }

    /// Suggestions from the last analysis.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = suggestions;
    }

    /// Review the edits suggestion `index` would make to the current text.
    pub fn review(&self, index: usize) -> Option<Review<'_>> {
        self.review_with(index, Aligner::default())
    }

    pub fn review_with(&self, index: usize, aligner: Aligner) -> Option<Review<'_>> {
        self.suggestions
            .get(index)
            .map(|s| Review::with_aligner(&self.text, &s.corrected, aligner))
    }

    /// Make `revised` the working text and record it in history.
    ///
    /// Returns the new history version.
    pub fn apply(&mut self, revised: impl Into<String>) -> usize {
        let revised = revised.into();
        let version = self.history.push(revised.clone());
        self.set_text(revised);
        log::info!("Applied revision as version {version}");
        version
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The entries a front end should list.
    pub fn recent_history(&self) -> Vec<HistoryEntry<'_>> {
        self.history.recent(HISTORY_DISPLAY_LIMIT)
    }

    /// Make history `version` the working text again.
    ///
    /// History itself is left untouched.  Returns `false` for an unknown
    /// version.
    pub fn restore(&mut self, version: usize) -> bool {
        match self.history.get(version) {
            Some(text) => {
                let text = text.to_string();
                self.set_text(text);
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
