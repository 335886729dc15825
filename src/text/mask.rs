//! Code-block masking.
//!
//! Fenced code (anything between a pair of triple backticks, newlines
//! included) must never be rewritten by the correction provider.  Before
//! any transform, [`mask_code_blocks`] swaps each block for a placeholder
//! key such as `[[[CODE_BLOCK_0]]]`; [`unmask_code_blocks`] puts the
//! original blocks back afterwards.
//!
//! Placeholders contain no whitespace, so they survive
//! [`normalize_whitespace`] and whitespace tokenisation unchanged.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Prefix shared by every generated placeholder key.
const PLACEHOLDER_PREFIX: &str = "[[[CODE_BLOCK_";
const PLACEHOLDER_SUFFIX: &str = "]]]";

fn code_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Non-greedy so two adjacent blocks stay two blocks.
    PATTERN.get_or_init(|| Regex::new(r"(?s)```.*?```").expect("code block pattern is valid"))
}

fn whitespace_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

// ---------------------------------------------------------------------------
// BlockMap
// ---------------------------------------------------------------------------

/// Ordered mapping placeholder key → original code block (fences included).
///
/// Iteration order is discovery order, which is also the order of the
/// numeric suffix in the keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockMap {
    entries: Vec<(String, String)>,
}

impl BlockMap {
    /// Original block content for `key`, if it was produced by this pass.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, block)| block.as_str())
    }

    /// `(key, block)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Placeholder keys in discovery order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// mask / unmask
// ---------------------------------------------------------------------------

/// Replace every fenced code block in `text` with a unique placeholder.
///
/// Returns the rewritten text and the placeholder → block mapping.  Text
/// without code blocks comes back unchanged with an empty map; an opening
/// fence with no closing fence is left as literal text.
///
/// ```
/// use autocorrect::text::mask::{mask_code_blocks, unmask_code_blocks};
///
/// let (masked, blocks) = mask_code_blocks("run ```ls -la``` now");
/// assert_eq!(masked, "run [[[CODE_BLOCK_0]]] now");
/// assert_eq!(unmask_code_blocks(&masked, &blocks), "run ```ls -la``` now");
/// ```
pub fn mask_code_blocks(text: &str) -> (String, BlockMap) {
    let prefix = placeholder_prefix(text);
    let mut blocks = BlockMap::default();

    let masked = code_block_pattern().replace_all(text, |caps: &Captures<'_>| {
        let key = format!("{prefix}{}{PLACEHOLDER_SUFFIX}", blocks.len());
        blocks.entries.push((key.clone(), caps[0].to_string()));
        key
    });

    (masked.into_owned(), blocks)
}

/// Restore every placeholder in `text` from `blocks`, in discovery order.
///
/// Keys end in `]]]`, so none is a prefix of another (`_1]]]` never
/// matches inside `_10]]]`) and the order of replacement does not change
/// the result.  A placeholder with no mapping stays visible in the output
/// so the anomaly can be noticed and reported.  Applying it twice is the
/// same as applying it once, because no block contains a key of its own
/// pass.
pub fn unmask_code_blocks(text: &str, blocks: &BlockMap) -> String {
    let mut restored = text.to_string();
    for (key, block) in blocks.iter() {
        if restored.contains(key) {
            restored = restored.replace(key, block);
        }
    }
    restored
}

/// Trim `text` and collapse each whitespace run to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    whitespace_run().replace_all(text.trim(), " ").into_owned()
}

/// Pick a key prefix that does not already occur anywhere in `text`.
///
/// The plain prefix is used unless the text already contains it (for
/// example, a user pasting masked output back in); then a numeric salt is
/// appended until the prefix is absent, keeping keys collision-free.
fn placeholder_prefix(text: &str) -> String {
    if !text.contains(PLACEHOLDER_PREFIX) {
        return PLACEHOLDER_PREFIX.to_string();
    }
    (0u64..)
        .map(|salt| format!("{PLACEHOLDER_PREFIX}{salt}_"))
        .find(|candidate| !text.contains(candidate.as_str()))
        .unwrap_or_else(|| PLACEHOLDER_PREFIX.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
