//! Diff highlighting for display.
//!
//! [`render`] walks the same opcodes the merge uses and annotates the
//! changed spans:
//!
//! | Opcode    | Tokens shown | HTML class | Plain     | Terminal          |
//! |-----------|--------------|------------|-----------|-------------------|
//! | `equal`   | original     | —          | as is     | as is             |
//! | `replace` | candidate    | `suggest`  | `{~t~}`   | red               |
//! | `insert`  | candidate    | `insert`   | `{+t+}`   | blue              |
//! | `delete`  | original     | `del`      | `[-t-]`   | dimmed, struck    |
//!
//! The result is for people to read.  Nothing downstream parses it.

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::text::diff::{compute_edits, EditScript, OpTag};

// ---------------------------------------------------------------------------
// HighlightStyle
// ---------------------------------------------------------------------------

/// Markup flavour produced by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    /// `<span class='…'>` wrappers; token text is HTML-escaped.
    #[default]
    Html,
    /// ASCII brackets, for logs and plain terminals.
    Plain,
    /// ANSI colours via `colored`.
    Ansi,
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Colour theme for HTML output; supplies the CSS for the span classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Solarized,
}

impl Theme {
    /// Stylesheet defining `.suggest`, `.insert` and `.del` for this theme.
    pub fn css(&self) -> &'static str {
        match self {
            Theme::Light => concat!(
                "<style>\n",
                "body { color: #111; }\n",
                ".suggest { color: #b91c1c; } .insert { color: #1d4ed8; } ",
                ".del { color: #6b7280; text-decoration: line-through; }\n",
                "</style>\n",
            ),
            Theme::Dark => concat!(
                "<style>\n",
                "body { color: #e5e7eb; background: #0b1220; }\n",
                ".suggest { color: #f87171; } .insert { color: #93c5fd; } ",
                ".del { color: #9ca3af; text-decoration: line-through; }\n",
                "</style>\n",
            ),
            Theme::Solarized => concat!(
                "<style>\n",
                "body { color: #073642; background: #fdf6e3; }\n",
                ".suggest { color: #dc322f; } .insert { color: #268bd2; } ",
                ".del { color: #586e75; text-decoration: line-through; }\n",
                "</style>\n",
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the diff of `original` → `candidate` as HTML spans.
pub fn render(original: &str, candidate: &str) -> String {
    render_with(original, candidate, HighlightStyle::Html)
}

/// Render the diff of `original` → `candidate` in the given style.
pub fn render_with(original: &str, candidate: &str, style: HighlightStyle) -> String {
    render_script(&compute_edits(original, candidate), style)
}

/// Render an already computed script.
pub fn render_script(script: &EditScript<'_>, style: HighlightStyle) -> String {
    let mut out: Vec<String> = Vec::with_capacity(script.candidate_tokens().len());

    for op in script.opcodes() {
        let tokens = match op.tag {
            OpTag::Equal | OpTag::Delete => script.before_of(op),
            OpTag::Replace | OpTag::Insert => script.after_of(op),
        };
        out.extend(tokens.iter().map(|token| annotate(token, op.tag, style)));
    }

    out.join(" ")
}

fn annotate(token: &str, tag: OpTag, style: HighlightStyle) -> String {
    match style {
        HighlightStyle::Html => {
            let token = escape_html(token);
            match tag {
                OpTag::Equal => token,
                OpTag::Replace => format!("<span class='suggest'>{token}</span>"),
                OpTag::Insert => format!("<span class='insert'>{token}</span>"),
                OpTag::Delete => format!("<span class='del'>{token}</span>"),
            }
        }
        HighlightStyle::Plain => match tag {
            OpTag::Equal => token.to_string(),
            OpTag::Replace => format!("{{~{token}~}}"),
            OpTag::Insert => format!("{{+{token}+}}"),
            OpTag::Delete => format!("[-{token}-]"),
        },
        HighlightStyle::Ansi => match tag {
            OpTag::Equal => token.to_string(),
            OpTag::Replace => token.red().bold().to_string(),
            OpTag::Insert => token.blue().bold().to_string(),
            OpTag::Delete => token.dimmed().strikethrough().to_string(),
        },
    }
}

fn escape_html(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len());
    for c in token.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_marks_replacement() {
        assert_eq!(
            render("The quick brown fox", "The quick brown foxes"),
            "The quick brown <span class='suggest'>foxes</span>"
        );
    }

    #[test]
    fn html_marks_insert_and_delete() {
        assert_eq!(
            render("hello there world", "hello world again"),
            "hello <span class='del'>there</span> world <span class='insert'>again</span>"
        );
    }

    #[test]
    fn html_escapes_token_text() {
        assert_eq!(
            render("a", "<b>"),
            "<span class='suggest'>&lt;b&gt;</span>"
        );
        assert_eq!(render("x&y", "x&y"), "x&amp;y");
    }

    #[test]
    fn plain_markers() {
        assert_eq!(
            render_with("one two three", "one 2 three four", HighlightStyle::Plain),
            "one {~2~} three {+four+}"
        );
        assert_eq!(
            render_with("one two", "one", HighlightStyle::Plain),
            "one [-two-]"
        );
    }

    #[test]
    fn identical_text_renders_unchanged() {
        assert_eq!(render_with("A B C", "A B C", HighlightStyle::Plain), "A B C");
    }

    #[test]
    fn ansi_keeps_token_text() {
        let rendered = render_with("one two", "one three", HighlightStyle::Ansi);
        assert!(rendered.starts_with("one "));
        assert!(rendered.contains("three"));
    }

    #[test]
    fn every_theme_styles_all_classes() {
        for theme in [Theme::Light, Theme::Dark, Theme::Solarized] {
            let css = theme.css();
            assert!(css.contains(".suggest"));
            assert!(css.contains(".insert"));
            assert!(css.contains(".del"));
            assert!(css.contains("line-through"));
        }
    }
}
