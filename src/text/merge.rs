//! Selective merge: rebuild a text keeping only the accepted edits.
//!
//! An accept mask holds one boolean per non-equal opcode, in script order.
//! Entries past the end of a short mask count as rejected, so an
//! unreviewed change never sneaks into the result.  The output is the
//! chosen tokens joined with single spaces.

use crate::text::diff::{compute_edits, EditScript, OpTag};

/// Diff `original` against `candidate` and merge with `accept_mask`.
///
/// ```
/// use autocorrect::text::merge::apply_mask;
///
/// assert_eq!(apply_mask("one two", "one", &[true]), "one");
/// assert_eq!(apply_mask("one two", "one", &[false]), "one two");
/// assert_eq!(apply_mask("one two", "one", &[]), "one two");
/// ```
pub fn apply_mask(original: &str, candidate: &str, accept_mask: &[bool]) -> String {
    apply_script(&compute_edits(original, candidate), accept_mask)
}

/// Merge an already computed script with `accept_mask`.
pub fn apply_script(script: &EditScript<'_>, accept_mask: &[bool]) -> String {
    let mut decisions = accept_mask.iter().copied();
    let mut merged: Vec<&str> = Vec::with_capacity(script.original_tokens().len());

    for op in script.opcodes() {
        if op.tag == OpTag::Equal {
            merged.extend_from_slice(script.before_of(op));
            continue;
        }

        let accepted = decisions.next().unwrap_or(false);
        match (op.tag, accepted) {
            (OpTag::Delete, true) => {}
            (_, true) => merged.extend_from_slice(script.after_of(op)),
            // inserts have an empty before side, so rejecting adds nothing
            (_, false) => merged.extend_from_slice(script.before_of(op)),
        }
    }

    merged.join(" ")
}

/// A mask accepting every one of `changes` edits.
pub fn accept_all(changes: usize) -> Vec<bool> {
    vec![true; changes]
}

/// A mask rejecting every one of `changes` edits.
pub fn reject_all(changes: usize) -> Vec<bool> {
    vec![false; changes]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGINAL: &str = "i has a apple and two banana";
    const CANDIDATE: &str = "I have an apple and two bananas today";

    #[test]
    fn replacement_accept_and_reject() {
        let original = "The quick brown fox";
        let candidate = "The quick brown foxes";
        assert_eq!(apply_mask(original, candidate, &[true]), candidate);
        assert_eq!(apply_mask(original, candidate, &[false]), original);
    }

    #[test]
    fn identical_text_with_empty_mask() {
        assert_eq!(apply_mask("A B C", "A B C", &[]), "A B C");
    }

    #[test]
    fn deletion_accept_and_reject() {
        assert_eq!(apply_mask("one two", "one", &[true]), "one");
        assert_eq!(apply_mask("one two", "one", &[false]), "one two");
    }

    #[test]
    fn insertion_reject_adds_nothing() {
        assert_eq!(apply_mask("world", "hello world", &[false]), "world");
        assert_eq!(apply_mask("world", "hello world", &[true]), "hello world");
    }

    #[test]
    fn full_accept_gives_candidate_tokens() {
        let script = compute_edits(ORIGINAL, CANDIDATE);
        let merged = apply_script(&script, &accept_all(script.change_count()));
        assert_eq!(merged, CANDIDATE);
    }

    #[test]
    fn full_reject_gives_original_tokens() {
        let script = compute_edits(ORIGINAL, CANDIDATE);
        let merged = apply_script(&script, &reject_all(script.change_count()));
        assert_eq!(merged, ORIGINAL);
    }

    #[test]
    fn mixed_decisions_apply_independently() {
        // changes: [i has a -> I have an], [banana -> bananas today]
        assert_eq!(
            apply_mask(ORIGINAL, CANDIDATE, &[true, false]),
            "I have an apple and two banana"
        );
        assert_eq!(
            apply_mask(ORIGINAL, CANDIDATE, &[false, true]),
            "i has a apple and two bananas today"
        );
    }

    #[test]
    fn short_mask_rejects_the_rest() {
        assert_eq!(
            apply_mask(ORIGINAL, CANDIDATE, &[true]),
            "I have an apple and two banana"
        );
    }

    #[test]
    fn long_mask_ignores_extra_entries() {
        assert_eq!(apply_mask("a", "b", &[true, false, true]), "b");
    }

    #[test]
    fn output_normalises_whitespace() {
        assert_eq!(apply_mask("a\n\nb   c", "a b  d", &[false]), "a b c");
    }
}
