//! Built-in domain dictionaries.
//!
//! Each [`Dictionary`] contributes a fixed list of legitimate terms that
//! are added to the preserve set, and its label is passed to the provider
//! so it does not "correct" specialised vocabulary.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Static term lists
// ---------------------------------------------------------------------------

static MEDICAL: &[&str] = &[
    "hypertension",
    "myocardial",
    "diastolic",
    "metformin",
    "angioplasty",
];

static LEGAL: &[&str] = &["tort", "estoppel", "habeas", "jurisprudence", "fiduciary"];

static CODING: &[&str] = &[
    "NumPy",
    "PyTorch",
    "TensorFlow",
    "async",
    "await",
    "TypeScript",
];

// ---------------------------------------------------------------------------
// Dictionary
// ---------------------------------------------------------------------------

/// A built-in terminology domain.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Dictionary {
    Medical,
    Legal,
    Coding,
}

impl Dictionary {
    pub const ALL: [Dictionary; 3] = [Dictionary::Medical, Dictionary::Legal, Dictionary::Coding];

    /// Domain name as given to the provider.
    pub fn label(&self) -> &'static str {
        match self {
            Dictionary::Medical => "Medical",
            Dictionary::Legal => "Legal",
            Dictionary::Coding => "Coding",
        }
    }

    /// Terms preserved when this dictionary is enabled.
    pub fn terms(&self) -> &'static [&'static str] {
        match self {
            Dictionary::Medical => MEDICAL,
            Dictionary::Legal => LEGAL,
            Dictionary::Coding => CODING,
        }
    }
}

impl std::fmt::Display for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dictionary_has_terms() {
        for dict in Dictionary::ALL {
            assert!(!dict.terms().is_empty(), "{dict} has no terms");
        }
    }

    #[test]
    fn coding_terms_keep_casing() {
        let terms = Dictionary::Coding.terms();
        assert!(terms.contains(&"PyTorch"));
        assert!(terms.contains(&"TypeScript"));
        assert!(!terms.contains(&"pytorch"));
    }

    #[test]
    fn labels() {
        assert_eq!(Dictionary::Medical.label(), "Medical");
        assert_eq!(Dictionary::Legal.to_string(), "Legal");
    }
}
