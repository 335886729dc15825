//! Optional features, queried before use.
//!
//! Front ends check [`Capability::is_available`] and hide or explain
//! whatever this build cannot do instead of failing halfway.

use crate::document::DocumentFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Reading and writing `.docx` documents.
    RichDocument,
    /// Reading corrected text aloud.
    SpeechSynthesis,
    /// Turning recorded speech into input text.
    Transcription,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::RichDocument,
        Capability::SpeechSynthesis,
        Capability::Transcription,
    ];

    pub fn is_available(&self) -> bool {
        match self {
            Capability::RichDocument => DocumentFormat::Docx.is_available(),
            Capability::SpeechSynthesis | Capability::Transcription => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Capability::RichDocument => "rich documents (.docx)",
            Capability::SpeechSynthesis => "speech synthesis",
            Capability::Transcription => "speech transcription",
        }
    }

    /// Why the capability is missing, or `None` when it is available.
    pub fn unavailable_reason(&self) -> Option<&'static str> {
        if self.is_available() {
            return None;
        }
        Some(match self {
            Capability::RichDocument => "built without the `docx` feature",
            Capability::SpeechSynthesis | Capability::Transcription => {
                "not supported by this build"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_is_never_available() {
        assert!(!Capability::SpeechSynthesis.is_available());
        assert!(!Capability::Transcription.is_available());
        assert!(Capability::Transcription.unavailable_reason().is_some());
    }

    #[test]
    fn rich_documents_follow_feature() {
        assert_eq!(
            Capability::RichDocument.is_available(),
            cfg!(feature = "docx")
        );
        assert_eq!(
            Capability::RichDocument.unavailable_reason().is_none(),
            cfg!(feature = "docx")
        );
    }
}
