//! Cursor marker injection.
//!
//! The marker is spliced into the raw text before paragraph splitting, so its place in
//! the rendered paragraph stream is exactly the (clamped) character offset it was given.

/// Element id of the injected marker in the HTML projection.
pub const CURSOR_ELEMENT_ID: &str = "cursor";

/// Glyph used when a snapshot does not name one.
pub const DEFAULT_CURSOR_GLYPH: &str = "|";

/// The marker element carried through segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorMarker {
    glyph: String,
}

impl CursorMarker {
    pub fn new(glyph: impl Into<String>) -> Self {
        Self {
            glyph: glyph.into(),
        }
    }

    /// Raw glyph as delivered by the host.
    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    /// HTML form of the marker: `<span id="cursor">glyph</span>` with the glyph escaped.
    pub fn markup(&self) -> String {
        format!(
            "<span id=\"{CURSOR_ELEMENT_ID}\">{}</span>",
            escape_html(&self.glyph)
        )
    }
}

/// Text split around the marker position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedText<'a> {
    pub before: &'a str,
    pub marker: CursorMarker,
    pub after: &'a str,
    /// Clamped offset, in chars.
    pub offset: usize,
}

impl InjectedText<'_> {
    /// Flat HTML form: `before + markup + after`.
    pub fn to_markup(&self) -> String {
        let mut out = String::with_capacity(self.before.len() + self.after.len() + 32);
        out.push_str(self.before);
        out.push_str(&self.marker.markup());
        out.push_str(self.after);
        out
    }
}

/// Clamp `offset` into `[0, char count of text]`.
pub fn clamp_offset(text: &str, offset: i64) -> usize {
    if offset <= 0 {
        return 0;
    }
    let len = text.chars().count();
    usize::try_from(offset).map_or(len, |offset| offset.min(len))
}

/// Split `text` at the clamped `offset` and attach a marker for `glyph`.
pub fn inject_cursor<'a>(text: &'a str, offset: i64, glyph: &str) -> InjectedText<'a> {
    let offset = clamp_offset(text, offset);
    let split = byte_index_for_char(text, offset);
    InjectedText {
        before: &text[..split],
        marker: CursorMarker::new(glyph),
        after: &text[split..],
        offset,
    }
}

/// Minimal HTML escaping: `&`, `<`, `>` only.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn byte_index_for_char(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(index, _)| index)
}
