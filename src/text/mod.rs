//! Text core: masking, diffing, selective merging and highlighting.
//!
//! ```text
//! raw text ──mask──▶ masked ──normalize──▶ provider ──unmask──▶ candidate
//!                                                                  │
//!                         original + candidate ──compute_edits──▶ EditScript
//!                                                                  │
//!                              ┌───────────────────────────────────┤
//!                              ▼                                   ▼
//!                    render (display only)        apply_script(accept mask)
//! ```
//!
//! Nothing in this module fails: well-formed strings in, strings out.

pub mod diff;
pub mod highlight;
pub mod mask;
pub mod merge;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use diff::{
    compute_edits, compute_edits_with, tokenize, Aligner, EditScript, OpTag, Opcode, PendingEdit,
};
pub use highlight::{render, render_script, render_with, HighlightStyle, Theme};
pub use mask::{mask_code_blocks, normalize_whitespace, unmask_code_blocks, BlockMap};
pub use merge::{accept_all, apply_mask, apply_script, reject_all};
