//! Paragraph segmentation.
//!
//! Paragraphs are the lines of the marker-injected text. A paragraph is a sequence of
//! spans so the marker stays individually addressable; its HTML projection is the
//! `<p>` markup a webview backend would insert.

use crate::core::cursor::{CursorMarker, InjectedText};

/// Filler glyph giving blank lines a non-zero extent in vertical flow.
pub const BLANK_FILLER: &str = "_";

const BLANK_CLASS: &str = "blank";

/// A contiguous run of paragraph content.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Span {
    /// Caller-supplied text, emitted verbatim (not escaped).
    Text(String),
    Cursor(CursorMarker),
}

/// One rendered line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Paragraph {
    spans: Vec<Span>,
    blank: bool,
}

impl Paragraph {
    fn from_line(line: &str) -> Self {
        let blank = is_blank_line(line);
        let spans = if line.is_empty() {
            Vec::new()
        } else {
            vec![Span::Text(line.to_string())]
        };
        Self { spans, blank }
    }

    fn with_cursor(head: &str, marker: CursorMarker, tail: &str) -> Self {
        let mut spans = Vec::with_capacity(3);
        if !head.is_empty() {
            spans.push(Span::Text(head.to_string()));
        }
        spans.push(Span::Cursor(marker));
        if !tail.is_empty() {
            spans.push(Span::Text(tail.to_string()));
        }
        // The marker element is content, so a line holding it is never blank.
        Self {
            spans,
            blank: false,
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// True when the line is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    pub fn has_cursor(&self) -> bool {
        self.spans
            .iter()
            .any(|span| matches!(span, Span::Cursor(_)))
    }

    /// Line text without the marker.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            if let Span::Text(text) = span {
                out.push_str(text);
            }
        }
        out
    }

    /// Inner HTML of the paragraph.
    pub fn content(&self) -> String {
        if self.blank {
            return BLANK_FILLER.to_string();
        }
        let mut out = String::new();
        for span in &self.spans {
            match span {
                Span::Text(text) => out.push_str(text),
                Span::Cursor(marker) => out.push_str(&marker.markup()),
            }
        }
        out
    }

    pub fn to_html(&self) -> String {
        if self.blank {
            format!("<p class=\"{BLANK_CLASS}\">{BLANK_FILLER}</p>")
        } else {
            format!("<p>{}</p>", self.content())
        }
    }
}

/// Split injected text into paragraphs on `\n`.
///
/// The marker has no line break of its own, so it lands in exactly one paragraph: the
/// one formed by the last line of `before` and the first line of `after`.
pub fn segment(injected: &InjectedText<'_>) -> Vec<Paragraph> {
    let mut before_lines: Vec<&str> = injected.before.split('\n').collect();
    let head = before_lines.pop().unwrap_or_default();
    let mut after_lines = injected.after.split('\n');
    let tail = after_lines.next().unwrap_or_default();

    let mut paragraphs = Vec::with_capacity(before_lines.len() + 1);
    paragraphs.extend(before_lines.into_iter().map(Paragraph::from_line));
    paragraphs.push(Paragraph::with_cursor(
        head,
        injected.marker.clone(),
        tail,
    ));
    paragraphs.extend(after_lines.map(Paragraph::from_line));
    paragraphs
}

/// HTML projection of a paragraph list.
pub fn paragraphs_to_html(paragraphs: &[Paragraph]) -> String {
    paragraphs.iter().map(Paragraph::to_html).collect()
}

/// Empty or whitespace-only. U+FEFF counts as whitespace, as it does for `\s` in
/// ECMAScript regular expressions.
pub fn is_blank_line(line: &str) -> bool {
    line.chars().all(|ch| ch.is_whitespace() || ch == '\u{feff}')
}
