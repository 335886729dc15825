//! `.docx` encoding via `docx-rs`: one paragraph per line of text.

use std::io::Cursor;

use docx_rs::{read_docx, DocumentChild, Docx, Paragraph, ParagraphChild, Run, RunChild};

use super::FormatError;

pub(super) fn encode(text: &str) -> Result<Vec<u8>, FormatError> {
    let mut doc = Docx::new();
    for line in text.lines() {
        doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    let mut buf = Vec::new();
    doc.build()
        .pack(Cursor::new(&mut buf))
        .map_err(|e| FormatError::Encode(e.to_string()))?;
    Ok(buf)
}

pub(super) fn decode(bytes: &[u8]) -> Result<String, FormatError> {
    let docx = read_docx(bytes).map_err(|e| FormatError::Decode(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::split_segments;

    #[test]
    fn round_trip_keeps_paragraphs() {
        let text = "First paragraph.\n\nSecond paragraph,\nwith two lines.";
        let bytes = encode(text).unwrap();
        assert!(bytes.starts_with(b"PK"), "docx is a zip archive");
        assert_eq!(decode(&bytes).unwrap(), text);
    }

    #[test]
    fn segments_survive_round_trip() {
        let text = "One.\n\nTwo.\n\nThree.";
        let decoded = decode(&encode(text).unwrap()).unwrap();
        assert_eq!(split_segments(&decoded), ["One.", "Two.", "Three."]);
    }

    #[test]
    fn export_writes_encoded_archive() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.docx");
        let text = "Line one.\nLine two.";
        crate::document::write_export(&path, text, None).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert!(written.starts_with(b"PK"));
        assert!(written.len() > text.len());
        assert_eq!(crate::document::import(&path).unwrap(), text);
    }

    #[test]
    fn garbage_is_decode_error() {
        assert!(matches!(
            decode(b"not a zip"),
            Err(FormatError::Decode(_))
        ));
    }
}
