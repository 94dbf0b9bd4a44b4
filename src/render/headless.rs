//! Deterministic in-memory display surface.
//!
//! Lays paragraphs out as vertical columns flowing right to left, the way a
//! `writing-mode: vertical-rl` container does, so marker geometry and scroll
//! clamping can be exercised without a browser.
//!
//! Model:
//! - column pitch is `LINE_PITCH_EM` times the font size;
//! - each grapheme advances down its column by its vertical advance;
//! - a paragraph wraps to a new column when the next grapheme would pass the
//!   container's client height;
//! - blank paragraphs occupy one column;
//! - the first column sits against the right edge when `scroll_left == 0`.

use unicode_segmentation::UnicodeSegmentation;

use crate::core::geometry::Rect;
use crate::core::snapshot::FontStyle;
use crate::core::text::width::advance_em;
use crate::render::paragraph::{Paragraph, Span};
use crate::render::surface::{DisplaySurface, ViewportMetrics};

pub const LINE_PITCH_EM: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct MarkerSlot {
    column: usize,
    offset: f64,
    extent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    columns: usize,
    marker: Option<MarkerSlot>,
}

#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    paragraphs: Vec<Paragraph>,
    font: FontStyle,
    client_width: f64,
    client_height: f64,
    inner_width: f64,
    inner_height: f64,
    scroll_left: f64,
    marker_visible: bool,
    clears: usize,
}

impl HeadlessSurface {
    /// Surface whose container fills the window.
    pub fn new(client_width: f64, client_height: f64) -> Self {
        Self {
            paragraphs: Vec::new(),
            font: FontStyle::default(),
            client_width,
            client_height,
            inner_width: client_width,
            inner_height: client_height,
            scroll_left: 0.0,
            marker_visible: true,
            clears: 0,
        }
    }

    pub fn with_window(mut self, inner_width: f64, inner_height: f64) -> Self {
        self.inner_width = inner_width;
        self.inner_height = inner_height;
        self
    }

    pub fn resize(&mut self, client_width: f64, client_height: f64) {
        self.client_width = client_width;
        self.client_height = client_height;
        self.clamp_scroll();
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph_html(&self) -> Vec<String> {
        self.paragraphs.iter().map(Paragraph::to_html).collect()
    }

    /// Paragraph markup with the current font applied inline.
    pub fn styled_html(&self) -> String {
        let style = self.font.css();
        self.paragraph_html()
            .into_iter()
            .map(|html| html.replacen("<p", &format!("<p style=\"{style}\""), 1))
            .collect()
    }

    pub fn font(&self) -> &FontStyle {
        &self.font
    }

    /// Marker visibility, or `None` when no marker is on the surface.
    pub fn marker_visible(&self) -> Option<bool> {
        self.has_marker().then_some(self.marker_visible)
    }

    /// How many times the surface has been cleared.
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn column_pitch(&self) -> f64 {
        self.font.size_px() * LINE_PITCH_EM
    }

    pub fn column_count(&self) -> usize {
        self.layout().columns
    }

    pub fn content_width(&self) -> f64 {
        self.column_count() as f64 * self.column_pitch()
    }

    /// Valid `scroll_left` range as `(min, max)`.
    pub fn scroll_range(&self) -> (f64, f64) {
        let overflow = (self.content_width() - self.client_width).max(0.0);
        (-overflow, 0.0)
    }

    fn has_marker(&self) -> bool {
        self.paragraphs.iter().any(Paragraph::has_cursor)
    }

    /// `scroll_left` as the current content allows it.
    fn effective_scroll(&self) -> f64 {
        let (min, max) = self.scroll_range();
        if self.scroll_left.is_finite() {
            self.scroll_left.clamp(min, max)
        } else {
            0.0
        }
    }

    fn clamp_scroll(&mut self) {
        self.scroll_left = self.effective_scroll();
    }

    fn layout(&self) -> Layout {
        let size = self.font.size_px();
        let capacity = self.client_height.max(size);
        let mut columns = 0;
        let mut marker = None;

        for paragraph in &self.paragraphs {
            if paragraph.is_blank() {
                columns += 1;
                continue;
            }

            let mut used = 0.0;
            for span in paragraph.spans() {
                match span {
                    Span::Text(text) => {
                        for grapheme in text.graphemes(true) {
                            let advance = advance_em(grapheme) * size;
                            if used > 0.0 && used + advance > capacity {
                                columns += 1;
                                used = 0.0;
                            }
                            used += advance;
                        }
                    }
                    Span::Cursor(cursor) => {
                        let advance = cursor
                            .glyph()
                            .graphemes(true)
                            .map(|grapheme| advance_em(grapheme) * size)
                            .sum::<f64>();
                        if used > 0.0 && used + advance > capacity {
                            columns += 1;
                            used = 0.0;
                        }
                        marker = Some(MarkerSlot {
                            column: columns,
                            offset: used,
                            extent: advance,
                        });
                        used += advance;
                    }
                }
            }
            columns += 1;
        }

        Layout { columns, marker }
    }
}

impl DisplaySurface for HeadlessSurface {
    fn clear(&mut self) {
        self.paragraphs.clear();
        self.marker_visible = true;
        self.clears += 1;
    }

    fn append_paragraph(&mut self, paragraph: &Paragraph) {
        self.paragraphs.push(paragraph.clone());
    }

    fn style_all(&mut self, font: &FontStyle) {
        self.font = font.clone();
        // Layout settles here; an offset past the new content snaps back into range.
        self.clamp_scroll();
    }

    fn marker_bounds(&self) -> Option<Rect> {
        let slot = self.layout().marker?;
        let size = self.font.size_px();
        let pitch = self.column_pitch();
        let column_left = self.client_width - (slot.column + 1) as f64 * pitch;
        Some(Rect::new(
            column_left + (pitch - size) / 2.0 - self.effective_scroll(),
            slot.offset,
            size,
            slot.extent,
        ))
    }

    fn set_marker_visible(&mut self, visible: bool) {
        self.marker_visible = visible;
    }

    fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics {
            scroll_left: self.effective_scroll(),
            client_width: self.client_width,
            client_height: self.client_height,
            inner_width: self.inner_width,
            inner_height: self.inner_height,
        }
    }

    fn set_scroll_left(&mut self, scroll_left: f64) {
        self.scroll_left = scroll_left;
        self.clamp_scroll();
    }
}
