//! LLM-assisted text correction with per-edit review.
//!
//! A hosted model proposes corrected versions of the user's text; this
//! crate diffs each proposal against the original at the token level so
//! the user can accept or reject every change on its own.  Fenced code
//! blocks are masked before the text leaves the machine and restored
//! afterwards.
//!
//! * [`text`] — masking, diffing, selective merge, highlighting.
//! * [`llm`] — the correction provider and its prompt/response handling.
//! * [`session`] — per-session state and the correction runner.
//! * [`document`] — `.txt`/`.docx` import and export, glossaries.
//! * [`config`] — `settings.toml` persistence.
//! * [`capability`] — optional features this build does or does not have.

pub mod capability;
pub mod config;
pub mod document;
pub mod llm;
pub mod session;
pub mod text;
