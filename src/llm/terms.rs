//! Preserve-term set: words the provider must leave exactly as written.
//!
//! Terms come from three places, merged into one sorted, deduplicated set:
//!
//! | Source              | Format                              |
//! |---------------------|-------------------------------------|
//! | custom terms        | comma-separated (`"TensorFlow, API"`) |
//! | built-in dictionary | [`Dictionary::terms`]               |
//! | glossary file       | one term per line                   |
//!
//! Matching is case and spelling sensitive: `PyTorch` and `pytorch` are
//! distinct terms.

use std::collections::BTreeSet;

use crate::llm::dictionary::Dictionary;

/// Sorted, deduplicated set of terms to preserve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreserveTerms {
    terms: BTreeSet<String>,
}

impl PreserveTerms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge user terms, enabled dictionaries and glossary terms.
    pub fn build(custom_terms: &str, dictionaries: &[Dictionary], glossary: &[String]) -> Self {
        let mut set = Self::new();
        set.extend(parse_custom_terms(custom_terms));
        for dict in dictionaries {
            set.extend(dict.terms().iter().copied());
        }
        set.extend(glossary.iter().cloned());
        set
    }

    /// Add one term; blank input is ignored.  Returns `true` if it was new.
    pub fn insert(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return false;
        }
        if trimmed.len() == term.len() {
            self.terms.insert(term)
        } else {
            self.terms.insert(trimmed.to_string())
        }
    }

    pub fn extend<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for term in terms {
            self.insert(term);
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.terms.iter().cloned().collect()
    }
}

/// Split a comma-separated term list, dropping blanks.
pub fn parse_custom_terms(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse newline-delimited glossary content, one term per non-empty line.
pub fn parse_glossary(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
