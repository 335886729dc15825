//! Token-level diff engine.
//!
//! Both texts are split on whitespace runs and aligned with the
//! longest-matching-block algorithm: find the longest contiguous run of
//! equal tokens in the current window (leftmost on ties), recurse on what
//! lies left and right of it, then turn the matching blocks into opcodes
//! that cover every token of both sides exactly once.
//!
//! ```text
//! original : The quick brown fox
//! candidate: The quick brown foxes
//!
//! equal   [0..3) [0..3)   The quick brown
//! replace [3..4) [3..4)   fox -> foxes
//! ```
//!
//! [`Aligner::Myers`] swaps the aligner for the `similar` crate's Myers
//! implementation.  Either way the opcodes satisfy the replay invariant:
//! concatenating the *before* ranges rebuilds the original token list, and
//! concatenating the *after* ranges rebuilds the candidate.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Candidates at least this long get the popular-token heuristic.
const POPULAR_MIN_LEN: usize = 200;

// ---------------------------------------------------------------------------
// OpTag / Opcode
// ---------------------------------------------------------------------------

/// Classification of one aligned span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    Equal,
    Replace,
    Insert,
    Delete,
}

impl OpTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpTag::Equal => "equal",
            OpTag::Replace => "replace",
            OpTag::Insert => "insert",
            OpTag::Delete => "delete",
        }
    }

    /// `true` for every tag except [`OpTag::Equal`].
    pub fn is_change(&self) -> bool {
        !matches!(self, OpTag::Equal)
    }
}

impl std::fmt::Display for OpTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One aligned span: `before` indexes original tokens, `after` indexes
/// candidate tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub before: Range<usize>,
    pub after: Range<usize>,
}

impl Opcode {
    fn new(tag: OpTag, before: Range<usize>, after: Range<usize>) -> Self {
        Self { tag, before, after }
    }
}

/// Alignment strategy used by [`compute_edits_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Aligner {
    /// Longest matching block, leftmost first.
    #[default]
    LongestBlock,
    /// Myers diff from the `similar` crate.
    Myers,
}

// ---------------------------------------------------------------------------
// PendingEdit
// ---------------------------------------------------------------------------

/// A reviewable change: the owned projection of one non-equal opcode.
///
/// The order of pending edits is the order of entries in an accept mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingEdit {
    pub tag: OpTag,
    pub before_tokens: Vec<String>,
    pub after_tokens: Vec<String>,
    pub before: Range<usize>,
    pub after: Range<usize>,
}

impl PendingEdit {
    /// Original side joined with spaces (empty for inserts).
    pub fn before_text(&self) -> String {
        self.before_tokens.join(" ")
    }

    /// Candidate side joined with spaces (empty for deletes).
    pub fn after_text(&self) -> String {
        self.after_tokens.join(" ")
    }
}

// ---------------------------------------------------------------------------
// EditScript
// ---------------------------------------------------------------------------

/// Tokens of both versions plus the opcodes aligning them.
#[derive(Debug, Clone)]
pub struct EditScript<'a> {
    original: Vec<&'a str>,
    candidate: Vec<&'a str>,
    opcodes: Vec<Opcode>,
}

impl<'a> EditScript<'a> {
    pub fn original_tokens(&self) -> &[&'a str] {
        &self.original
    }

    pub fn candidate_tokens(&self) -> &[&'a str] {
        &self.candidate
    }

    pub fn opcodes(&self) -> &[Opcode] {
        &self.opcodes
    }

    /// Non-equal opcodes in script order.
    pub fn changes(&self) -> impl Iterator<Item = &Opcode> {
        self.opcodes.iter().filter(|op| op.tag.is_change())
    }

    /// Number of entries an accept mask for this script should have.
    pub fn change_count(&self) -> usize {
        self.changes().count()
    }

    pub fn is_identical(&self) -> bool {
        self.change_count() == 0
    }

    /// Original tokens of `op`.
    pub fn before_of(&self, op: &Opcode) -> &[&'a str] {
        &self.original[op.before.clone()]
    }

    /// Candidate tokens of `op`.
    pub fn after_of(&self, op: &Opcode) -> &[&'a str] {
        &self.candidate[op.after.clone()]
    }

    /// Replay the *before* side of every opcode (rebuilds the original).
    pub fn replay_before(&self) -> Vec<&'a str> {
        self.opcodes
            .iter()
            .filter(|op| op.tag != OpTag::Insert)
            .flat_map(|op| self.before_of(op).iter().copied())
            .collect()
    }

    /// Replay the *after* side of every opcode (rebuilds the candidate).
    pub fn replay_after(&self) -> Vec<&'a str> {
        self.opcodes
            .iter()
            .filter(|op| op.tag != OpTag::Delete)
            .flat_map(|op| self.after_of(op).iter().copied())
            .collect()
    }

    /// Similarity in `[0, 1]`: twice the matched tokens over all tokens.
    pub fn ratio(&self) -> f64 {
        let total = self.original.len() + self.candidate.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = self
            .opcodes
            .iter()
            .filter(|op| op.tag == OpTag::Equal)
            .map(|op| op.before.len())
            .sum();
        2.0 * matched as f64 / total as f64
    }

    /// Owned list of the changes, for review front ends.
    pub fn pending_edits(&self) -> Vec<PendingEdit> {
        self.changes()
            .map(|op| PendingEdit {
                tag: op.tag,
                before_tokens: self.before_of(op).iter().map(|t| t.to_string()).collect(),
                after_tokens: self.after_of(op).iter().map(|t| t.to_string()).collect(),
                before: op.before.clone(),
                after: op.after.clone(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Split `text` into whitespace-delimited tokens; empty tokens are dropped.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Diff `original` against `candidate` with the default aligner.
pub fn compute_edits<'a>(original: &'a str, candidate: &'a str) -> EditScript<'a> {
    compute_edits_with(original, candidate, Aligner::default())
}

/// Diff `original` against `candidate` with an explicit aligner.
pub fn compute_edits_with<'a>(
    original: &'a str,
    candidate: &'a str,
    aligner: Aligner,
) -> EditScript<'a> {
    let original = tokenize(original);
    let candidate = tokenize(candidate);

    let opcodes = match aligner {
        Aligner::LongestBlock => BlockMatcher::new(&original, &candidate).opcodes(),
        Aligner::Myers => myers_opcodes(&original, &candidate),
    };

    EditScript {
        original,
        candidate,
        opcodes,
    }
}

// ---------------------------------------------------------------------------
// Longest-matching-block aligner
// ---------------------------------------------------------------------------

struct BlockMatcher<'s, T> {
    a: &'s [T],
    b: &'s [T],
    /// Positions of each candidate token; popular tokens are absent.
    b2j: HashMap<&'s T, Vec<usize>>,
}

impl<'s, T: Eq + Hash> BlockMatcher<'s, T> {
    fn new(a: &'s [T], b: &'s [T]) -> Self {
        let mut b2j: HashMap<&'s T, Vec<usize>> = HashMap::new();
        for (j, item) in b.iter().enumerate() {
            b2j.entry(item).or_default().push(j);
        }

        // Tokens that make up more than ~1% of a long candidate are noise
        // for seeding matches; they may still extend one.
        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the window, as
    /// `(i, j, k)`.  Ties resolve to the smallest `i`, then smallest `j`.
    fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);

        // run length of the match ending at (i - 1, j), keyed by j
        let mut run_len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next_run: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run.insert(j, k);
                    if k > best_len {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_len = k;
                    }
                }
            }
            run_len = next_run;
        }

        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && self.a[best_i + best_len] == self.b[best_j + best_len]
        {
            best_len += 1;
        }

        (best_i, best_j, best_len)
    }

    /// Matching blocks sorted by position, adjacent blocks merged, ending
    /// with the `(len_a, len_b, 0)` sentinel.
    fn matching_blocks(&self) -> Vec<(usize, usize, usize)> {
        let (len_a, len_b) = (self.a.len(), self.b.len());
        let mut windows = vec![(0, len_a, 0, len_b)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = windows.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            blocks.push((i, j, k));
            if alo < i && blo < j {
                windows.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                windows.push((i + k, ahi, j + k, bhi));
            }
        }
        blocks.sort_unstable();

        let mut merged = Vec::with_capacity(blocks.len() + 1);
        let (mut i1, mut j1, mut k1) = (0, 0, 0);
        for (i2, j2, k2) in blocks {
            if i1 + k1 == i2 && j1 + k1 == j2 {
                k1 += k2;
            } else {
                if k1 > 0 {
                    merged.push((i1, j1, k1));
                }
                (i1, j1, k1) = (i2, j2, k2);
            }
        }
        if k1 > 0 {
            merged.push((i1, j1, k1));
        }
        merged.push((len_a, len_b, 0));
        merged
    }

    fn opcodes(&self) -> Vec<Opcode> {
        let mut opcodes = Vec::new();
        let (mut i, mut j) = (0, 0);

        for (ai, bj, size) in self.matching_blocks() {
            let tag = match (i < ai, j < bj) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                opcodes.push(Opcode::new(tag, i..ai, j..bj));
            }
            i = ai + size;
            j = bj + size;
            if size > 0 {
                opcodes.push(Opcode::new(OpTag::Equal, ai..i, bj..j));
            }
        }

        opcodes
    }
}

// ---------------------------------------------------------------------------
// Myers aligner (similar)
// ---------------------------------------------------------------------------

fn myers_opcodes<T: Eq + Hash + Ord>(a: &[T], b: &[T]) -> Vec<Opcode> {
    let ops = similar::capture_diff_slices(similar::Algorithm::Myers, a, b);

    let mut opcodes: Vec<Opcode> = Vec::with_capacity(ops.len());
    for op in &ops {
        let (tag, before, after) = op.as_tag_tuple();
        if before.is_empty() && after.is_empty() {
            continue;
        }
        let tag = match tag {
            similar::DiffTag::Equal => OpTag::Equal,
            similar::DiffTag::Replace => OpTag::Replace,
            similar::DiffTag::Insert => OpTag::Insert,
            similar::DiffTag::Delete => OpTag::Delete,
        };

        // Keep runs maximal: fold neighbours that similar left split.
        if let Some(last) = opcodes.last_mut() {
            let merged_tag = match (last.tag, tag) {
                (OpTag::Equal, OpTag::Equal) => Some(OpTag::Equal),
                (OpTag::Equal, _) | (_, OpTag::Equal) => None,
                (OpTag::Insert, OpTag::Insert) => Some(OpTag::Insert),
                (OpTag::Delete, OpTag::Delete) => Some(OpTag::Delete),
                _ => Some(OpTag::Replace),
            };
            if let Some(merged_tag) = merged_tag {
                last.tag = merged_tag;
                last.before.end = before.end;
                last.after.end = after.end;
                continue;
            }
        }
        opcodes.push(Opcode::new(tag, before, after));
    }

    opcodes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
