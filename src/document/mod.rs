//! Document import/export and glossary loading.
//!
//! | Format | Import                     | Export                    |
//! |--------|----------------------------|---------------------------|
//! | `txt`  | UTF-8, invalid bytes lossy | passthrough               |
//! | `docx` | paragraph texts, one per line | one paragraph per line |
//!
//! `docx` needs the `docx` cargo feature; without it both directions
//! return [`FormatError::Unavailable`].

#[cfg(feature = "docx")]
mod docx;

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::parse_glossary;

// ---------------------------------------------------------------------------
// FormatError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FormatError {
    /// The file extension names no known format.
    #[error("unsupported file type {0:?}; use .txt or .docx")]
    Unsupported(String),

    /// The format is known but support was not compiled in.
    #[error("{0} support is not available; rebuild with `--features docx`")]
    Unavailable(DocumentFormat),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode document: {0}")]
    Encode(String),

    #[error("could not read document: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// DocumentFormat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Txt,
    Docx,
}

impl DocumentFormat {
    /// Pick the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "md" | "text" => Ok(DocumentFormat::Txt),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(FormatError::Unsupported(ext)),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Txt => "txt",
            DocumentFormat::Docx => "docx",
        }
    }

    /// Whether this build can read and write the format.
    pub fn is_available(&self) -> bool {
        match self {
            DocumentFormat::Txt => true,
            DocumentFormat::Docx => cfg!(feature = "docx"),
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Encode `text` in `format`.
pub fn export_text(text: &str, format: DocumentFormat) -> Result<Vec<u8>, FormatError> {
    match format {
        DocumentFormat::Txt => Ok(text.as_bytes().to_vec()),
        #[cfg(feature = "docx")]
        DocumentFormat::Docx => docx::encode(text),
        #[cfg(not(feature = "docx"))]
        DocumentFormat::Docx => Err(FormatError::Unavailable(DocumentFormat::Docx)),
    }
}

/// Encode `text` and write it to `path`.
///
/// The format comes from `format`, else from the extension.  The whole
/// document is encoded before the file is touched, so an encoding failure
/// leaves nothing behind.
pub fn write_export(
    path: &Path,
    text: &str,
    format: Option<DocumentFormat>,
) -> Result<(), FormatError> {
    let format = match format {
        Some(format) => format,
        None => DocumentFormat::from_path(path)?,
    };
    let bytes = export_text(text, format)?;
    std::fs::write(path, &bytes)?;
    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Decode a document held in memory.
pub fn import_bytes(bytes: &[u8], format: DocumentFormat) -> Result<String, FormatError> {
    match format {
        DocumentFormat::Txt => Ok(String::from_utf8_lossy(bytes).into_owned()),
        #[cfg(feature = "docx")]
        DocumentFormat::Docx => docx::decode(bytes),
        #[cfg(not(feature = "docx"))]
        DocumentFormat::Docx => Err(FormatError::Unavailable(DocumentFormat::Docx)),
    }
}

/// Read a `.txt` or `.docx` file as plain text.
pub fn import(path: &Path) -> Result<String, FormatError> {
    let format = DocumentFormat::from_path(path)?;
    if !format.is_available() {
        return Err(FormatError::Unavailable(format));
    }
    let bytes = std::fs::read(path)?;
    import_bytes(&bytes, format)
}

/// Read a newline-delimited glossary file.
pub fn read_glossary(path: &Path) -> Result<Vec<String>, FormatError> {
    let bytes = std::fs::read(path)?;
    Ok(parse_glossary(&String::from_utf8_lossy(&bytes)))
}

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

fn blank_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r?\n[ \t]*\r?\n").expect("static regex is valid"))
}

/// Split text into trimmed, non-empty blank-line separated segments.
pub fn split_segments(text: &str) -> Vec<&str> {
    blank_line()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Inverse of [`split_segments`] for already trimmed segments.
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("\n\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
