//! Turning free-form provider output into [`Suggestion`]s.
//!
//! Provider output is untrusted.  The JSON payload is looked for in order:
//!
//! 1. a fenced ```` ```json ```` block,
//! 2. the first `{…}` / `[…]` fragment,
//! 3. the whole text.
//!
//! An object carrying a `suggestions` array is unwrapped.  Anything that is
//! still not a list becomes one suggestion wrapping the trimmed raw text.
//! Parsing never fails.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::llm::suggestion::{Explanation, Suggestion, DEFAULT_CONFIDENCE};

fn fenced_json() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*\}|\[.*\])\s*```").expect("static regex is valid")
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse raw provider output.
///
/// `fallback_language` fills in suggestions that do not name a language.
pub fn parse_suggestions(raw: &str, fallback_language: &str) -> Vec<Suggestion> {
    let fallback_language = if fallback_language.trim().is_empty() {
        "Auto"
    } else {
        fallback_language
    };

    let items = match extract_json(raw) {
        Some(Value::Array(items)) => items,
        Some(Value::Object(mut obj)) => match obj.remove("suggestions") {
            Some(Value::Array(items)) => items,
            _ => {
                log::debug!("provider returned a JSON object without suggestions; using raw text");
                return vec![Suggestion::raw(raw, fallback_language)];
            }
        },
        _ => {
            log::debug!("provider output is not JSON; using raw text");
            return vec![Suggestion::raw(raw, fallback_language)];
        }
    };

    items
        .iter()
        .filter_map(|item| suggestion_from_value(item, fallback_language))
        .collect()
}

/// Locate and decode the JSON payload in `raw`.
pub fn extract_json(raw: &str) -> Option<Value> {
    if let Some(caps) = fenced_json().captures(raw) {
        if let Some(value) = caps.get(1).and_then(|m| decode(m.as_str())) {
            return Some(value);
        }
    }

    for fragment in json_fragments(raw) {
        if let Some(value) = decode(fragment) {
            return Some(value);
        }
    }

    decode(raw.trim())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Candidate fragments, earliest opening delimiter first.
fn json_fragments(text: &str) -> Vec<&str> {
    let mut fragments: Vec<(usize, &str)> = [('{', '}'), ('[', ']')]
        .into_iter()
        .filter_map(|(open, close)| {
            let start = text.find(open)?;
            let end = text.rfind(close)?;
            (start < end).then(|| (start, &text[start..=end]))
        })
        .collect();
    fragments.sort_by_key(|(start, _)| *start);
    fragments.into_iter().map(|(_, fragment)| fragment).collect()
}

/// Strict decode, then one retry with trailing commas removed.
fn decode(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    serde_json::from_str(text)
        .ok()
        .or_else(|| serde_json::from_str(&strip_trailing_commas(text)).ok())
}

fn strip_trailing_commas(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let mut lookahead = chars.clone();
                let next = lookahead.find(|n| !n.is_whitespace());
                if !matches!(next, Some(']') | Some('}')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn suggestion_from_value(value: &Value, fallback_language: &str) -> Option<Suggestion> {
    let obj = value.as_object()?;

    let corrected = obj
        .get("corrected")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    let explanations = obj
        .get("explanations")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(explanation_from_value).collect())
        .unwrap_or_default();

    let language = non_empty_str(obj.get("language"))
        .unwrap_or(fallback_language)
        .to_string();

    let translation = non_empty_str(obj.get("translation_en")).map(str::to_string);

    Some(Suggestion {
        corrected,
        confidence: confidence_from_value(obj.get("confidence")),
        explanations,
        language,
        translation,
    })
}

fn explanation_from_value(value: &Value) -> Option<Explanation> {
    let obj = value.as_object()?;
    let field = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Some(Explanation {
        before: field("before"),
        after: field("after"),
        reason: field("reason"),
    })
}

/// Numbers and numeric strings are clamped to `[0, 1]`; anything else
/// gets the default.
fn confidence_from_value(value: Option<&Value>) -> f32 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(c) if c.is_finite() => c.clamp(0.0, 1.0) as f32,
        _ => DEFAULT_CONFIDENCE,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_array() {
        let raw = r#"[{"corrected": " I have an apple. ", "confidence": 0.92,
            "explanations": [{"before": "has", "after": "have", "reason": "agreement"}],
            "language": "English", "translation_en": "I have an apple."}]"#;
        let out = parse_suggestions(raw, "Auto");

        assert_eq!(out.len(), 1);
        let s = &out[0];
        assert_eq!(s.corrected, "I have an apple.");
        assert!((s.confidence - 0.92).abs() < 1e-6);
        assert_eq!(s.language, "English");
        assert_eq!(s.translation.as_deref(), Some("I have an apple."));
        assert_eq!(
            s.explanations,
            [Explanation {
                before: "has".into(),
                after: "have".into(),
                reason: "agreement".into(),
            }]
        );
    }

    #[test]
    fn prefers_fenced_block() {
        let raw = "Sure! Here you go:\n```json\n[{\"corrected\": \"Fixed.\"}]\n```\nHope that helps {:}";
        let out = parse_suggestions(raw, "English");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].corrected, "Fixed.");
        assert_eq!(out[0].confidence, DEFAULT_CONFIDENCE);
        assert_eq!(out[0].language, "English");
    }

    #[test]
    fn finds_fragment_in_prose() {
        let raw = "Here are the suggestions: [{\"corrected\": \"One.\"}, {\"corrected\": \"Two.\"}] done";
        let out = parse_suggestions(raw, "Auto");
        let texts: Vec<&str> = out.iter().map(|s| s.corrected.as_str()).collect();
        assert_eq!(texts, ["One.", "Two."]);
    }

    #[test]
    fn unwraps_suggestions_object() {
        let raw = r#"{"suggestions": [{"corrected": "A."}, {"corrected": "B."}]}"#;
        assert_eq!(parse_suggestions(raw, "Auto").len(), 2);
    }

    #[test]
    fn other_object_becomes_raw_suggestion() {
        let raw = r#"{"corrected": "Only one."}"#;
        let out = parse_suggestions(raw, "French");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].corrected, raw);
        assert_eq!(out[0].confidence, DEFAULT_CONFIDENCE);
        assert_eq!(out[0].language, "French");
    }

    #[test]
    fn non_json_becomes_raw_suggestion() {
        let out = parse_suggestions("  I have an apple.  ", "");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].corrected, "I have an apple.");
        assert_eq!(out[0].language, "Auto");
        assert!(out[0].explanations.is_empty());
    }

    #[test]
    fn confidence_is_clamped_or_defaulted() {
        let raw = r#"[
            {"corrected": "a", "confidence": 1.7},
            {"corrected": "b", "confidence": -3},
            {"corrected": "c", "confidence": "0.25"},
            {"corrected": "d", "confidence": "high"},
            {"corrected": "e", "confidence": null}
        ]"#;
        let got: Vec<f32> = parse_suggestions(raw, "Auto")
            .iter()
            .map(|s| s.confidence)
            .collect();
        assert_eq!(got, [1.0, 0.0, 0.25, DEFAULT_CONFIDENCE, DEFAULT_CONFIDENCE]);
    }

    #[test]
    fn non_object_items_are_skipped() {
        let raw = r#"["text", 3, {"corrected": "kept"}, null]"#;
        let out = parse_suggestions(raw, "Auto");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].corrected, "kept");
    }

    #[test]
    fn missing_fields_default() {
        let out = parse_suggestions(r#"[{"explanations": [1, {"reason": "r"}]}]"#, "German");
        assert_eq!(out.len(), 1);
        let s = &out[0];
        assert_eq!(s.corrected, "");
        assert_eq!(s.language, "German");
        assert!(s.translation.is_none());
        assert_eq!(s.explanations.len(), 1);
        assert_eq!(s.explanations[0].reason, "r");
        assert_eq!(s.explanations[0].before, "");
    }

    #[test]
    fn empty_array_yields_no_suggestions() {
        assert!(parse_suggestions("[]", "Auto").is_empty());
    }

    #[test]
    fn tolerates_trailing_commas() {
        let raw = "[{\"corrected\": \"Fine, thanks.\", \"confidence\": 0.5,},]";
        let out = parse_suggestions(raw, "Auto");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].corrected, "Fine, thanks.");
    }

    #[test]
    fn trailing_comma_inside_string_is_kept() {
        assert_eq!(strip_trailing_commas(r#"["a,]", ]"#), r#"["a,]" ]"#);
    }
}
