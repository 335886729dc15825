//! Interactive review of one suggestion: per-edit accept/reject.

use crate::text::{
    apply_script, compute_edits_with, render_script, Aligner, EditScript, HighlightStyle,
    PendingEdit,
};

/// The edits between the working text and one suggestion, plus the user's
/// decision on each.
///
/// Every edit starts out accepted.
#[derive(Debug, Clone)]
pub struct Review<'a> {
    original: &'a str,
    candidate: &'a str,
    script: EditScript<'a>,
    decisions: Vec<bool>,
}

impl<'a> Review<'a> {
    pub fn new(original: &'a str, candidate: &'a str) -> Self {
        Self::with_aligner(original, candidate, Aligner::default())
    }

    pub fn with_aligner(original: &'a str, candidate: &'a str, aligner: Aligner) -> Self {
        let script = compute_edits_with(original, candidate, aligner);
        let decisions = vec![true; script.change_count()];
        Self {
            original,
            candidate,
            script,
            decisions,
        }
    }

    pub fn script(&self) -> &EditScript<'a> {
        &self.script
    }

    /// The reviewable edits, in mask order.
    pub fn edits(&self) -> Vec<PendingEdit> {
        self.script.pending_edits()
    }

    /// Number of edits.
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// The accept mask as it stands.
    pub fn decisions(&self) -> &[bool] {
        &self.decisions
    }

    /// Accept or reject edit `index`.  Returns `false` if there is no such
    /// edit.
    pub fn set(&mut self, index: usize, accept: bool) -> bool {
        match self.decisions.get_mut(index) {
            Some(slot) => {
                *slot = accept;
                true
            }
            None => false,
        }
    }

    /// Flip edit `index`; returns the new decision.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let slot = self.decisions.get_mut(index)?;
        *slot = !*slot;
        Some(*slot)
    }

    pub fn accept_all(&mut self) {
        self.decisions.fill(true);
    }

    pub fn reject_all(&mut self) {
        self.decisions.fill(false);
    }

    pub fn accepted_count(&self) -> usize {
        self.decisions.iter().filter(|&&d| d).count()
    }

    /// The text with only the accepted edits applied.
    ///
    /// When every edit is accepted the suggestion comes back verbatim, and
    /// when none is the original does, so line breaks and code layout
    /// survive.  Mixed decisions go through the token merge.
    pub fn merged(&self) -> String {
        if self.accepted_count() == self.len() {
            self.candidate.to_string()
        } else if self.accepted_count() == 0 {
            self.original.to_string()
        } else {
            apply_script(&self.script, &self.decisions)
        }
    }

    /// The suggestion with its edits marked up.
    pub fn highlighted(&self, style: HighlightStyle) -> String {
        render_script(&self.script, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::OpTag;

    const ORIGINAL: &str = "i has a apple and two banana";
    const CANDIDATE: &str = "I have an apple and two bananas today";

    #[test]
    fn starts_fully_accepted() {
        let review = Review::new(ORIGINAL, CANDIDATE);
        assert_eq!(review.len(), 2);
        assert_eq!(review.decisions(), [true, true]);
        assert_eq!(review.merged(), CANDIDATE);
    }

    #[test]
    fn edits_line_up_with_decisions() {
        let review = Review::new(ORIGINAL, CANDIDATE);
        let edits = review.edits();
        assert_eq!(edits.len(), review.len());
        assert_eq!(edits[0].tag, OpTag::Replace);
        assert_eq!(edits[0].before_text(), "i has a");
        assert_eq!(edits[0].after_text(), "I have an");
    }

    #[test]
    fn mixed_decisions_use_token_merge() {
        let mut review = Review::new(ORIGINAL, CANDIDATE);
        assert!(review.set(1, false));
        assert_eq!(review.merged(), "I have an apple and two banana");
    }

    #[test]
    fn rejecting_everything_returns_original_verbatim() {
        let original = "line one\nline two";
        let mut review = Review::new(original, "line 1\nline two");
        review.reject_all();
        assert_eq!(review.merged(), original);
    }

    #[test]
    fn accepting_everything_keeps_layout() {
        let candidate = "Intro:\n```\nfn main() {}\n```";
        let review = Review::new("intro:\n```\nfn main() {}\n```", candidate);
        assert_eq!(review.merged(), candidate);
    }

    #[test]
    fn toggle_and_out_of_range() {
        let mut review = Review::new("one two", "one");
        assert_eq!(review.toggle(0), Some(false));
        assert_eq!(review.merged(), "one two");
        assert_eq!(review.toggle(0), Some(true));
        assert_eq!(review.merged(), "one");
        assert_eq!(review.toggle(3), None);
        assert!(!review.set(3, true));
    }

    #[test]
    fn identical_texts_have_no_edits() {
        let review = Review::new("A B C", "A B C");
        assert!(review.is_empty());
        assert_eq!(review.merged(), "A B C");
    }

    #[test]
    fn highlighted_plain() {
        let review = Review::new("one two", "one");
        assert_eq!(review.highlighted(HighlightStyle::Plain), "one [-two-]");
    }
}
