//! Algebraic laws of masking, diffing and merging.

use autocorrect::text::{
    apply_mask, compute_edits, compute_edits_with, mask_code_blocks, tokenize,
    unmask_code_blocks, Aligner, OpTag,
};
use proptest::prelude::*;

/// Short texts over a small vocabulary, so diffs have plenty of matches.
fn words() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["a", "b", "c", "the", "fox", "Fox", "x.", "é"]),
        0..24,
    )
    .prop_map(|w| w.join(" "))
}

/// Text with fences, placeholder look-alikes and odd whitespace.
fn masked_input() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "word",
            " ",
            "\n",
            "```",
            "code()",
            "[[[CODE_BLOCK_0]]]",
            "[[[CODE_BLOCK_",
            "]]]",
            "`",
            "\t",
        ]),
        0..30,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn unmask_inverts_mask(text in masked_input()) {
        let (masked, blocks) = mask_code_blocks(&text);
        prop_assert_eq!(unmask_code_blocks(&masked, &blocks), text);
    }

    #[test]
    fn masked_text_has_no_fenced_blocks(text in masked_input()) {
        let (masked, blocks) = mask_code_blocks(&text);
        for (key, block) in blocks.iter() {
            prop_assert!(block.starts_with("```") && block.ends_with("```"));
            prop_assert!(masked.contains(key));
        }
    }

    #[test]
    fn opcodes_replay_both_sides(a in words(), b in words()) {
        for aligner in [Aligner::LongestBlock, Aligner::Myers] {
            let script = compute_edits_with(&a, &b, aligner);
            prop_assert_eq!(script.replay_before(), tokenize(&a));
            prop_assert_eq!(script.replay_after(), tokenize(&b));
        }
    }

    #[test]
    fn opcodes_are_contiguous(a in words(), b in words()) {
        let script = compute_edits(&a, &b);
        let (mut i, mut j) = (0, 0);
        for op in script.opcodes() {
            prop_assert_eq!(op.before.start, i);
            prop_assert_eq!(op.after.start, j);
            match op.tag {
                OpTag::Equal | OpTag::Replace => {
                    prop_assert!(!op.before.is_empty() && !op.after.is_empty());
                }
                OpTag::Insert => prop_assert!(op.before.is_empty() && !op.after.is_empty()),
                OpTag::Delete => prop_assert!(!op.before.is_empty() && op.after.is_empty()),
            }
            i = op.before.end;
            j = op.after.end;
        }
        prop_assert_eq!(i, tokenize(&a).len());
        prop_assert_eq!(j, tokenize(&b).len());
    }

    #[test]
    fn accepting_everything_yields_candidate(a in words(), b in words()) {
        let n = compute_edits(&a, &b).change_count();
        prop_assert_eq!(apply_mask(&a, &b, &vec![true; n]), tokenize(&b).join(" "));
    }

    #[test]
    fn rejecting_everything_yields_original(a in words(), b in words()) {
        let n = compute_edits(&a, &b).change_count();
        prop_assert_eq!(apply_mask(&a, &b, &vec![false; n]), tokenize(&a).join(" "));
    }

    #[test]
    fn short_or_long_masks_are_tolerated(
        a in words(),
        b in words(),
        mask in prop::collection::vec(any::<bool>(), 0..40),
    ) {
        let n = compute_edits(&a, &b).change_count();
        let mut padded = mask.clone();
        padded.truncate(n);
        padded.resize(n, false);
        prop_assert_eq!(apply_mask(&a, &b, &mask), apply_mask(&a, &b, &padded));
    }

    #[test]
    fn ratio_is_a_fraction(a in words(), b in words()) {
        let ratio = compute_edits(&a, &b).ratio();
        prop_assert!((0.0..=1.0).contains(&ratio));
    }
}
