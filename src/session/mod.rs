//! Session context and the correction runner.
//!
//! A [`Session`] owns everything one editing session needs (working text,
//! preserve terms, last suggestions, history).  [`CorrectionRunner`] fills
//! it with suggestions; a [`Review`] turns a suggestion plus the user's
//! accept/reject choices into the next version of the text.

pub mod review;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use review::Review;
pub use runner::{prepare_text, BatchOutcome, CorrectionRunner, SegmentOutcome, SessionError};
pub use state::{History, HistoryEntry, Session, HISTORY_DISPLAY_LIMIT};
