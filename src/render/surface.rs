//! Display surface capability.
//!
//! The engine never touches a concrete DOM or window. Any backend that can hold a
//! list of paragraphs, style them, report where the marker ended up, and scroll
//! horizontally can host the preview.

use crate::core::geometry::Rect;
use crate::core::snapshot::FontStyle;
use crate::render::paragraph::Paragraph;

/// Scroll position and viewport extents, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportMetrics {
    /// Horizontal scroll offset. In right-to-left vertical flow the start of the
    /// content is at 0 and scrolling toward later text goes negative.
    pub scroll_left: f64,
    /// Visible width of the scrolling container.
    pub client_width: f64,
    /// Visible height of the scrolling container.
    pub client_height: f64,
    /// Width of the enclosing window.
    pub inner_width: f64,
    /// Height of the enclosing window.
    pub inner_height: f64,
}

pub trait DisplaySurface {
    /// Drop every paragraph from the previous render.
    fn clear(&mut self);

    fn append_paragraph(&mut self, paragraph: &Paragraph);

    /// Apply font styling to every paragraph currently on the surface.
    fn style_all(&mut self, font: &FontStyle);

    /// Viewport-relative bounds of the marker element, if one is on the surface.
    fn marker_bounds(&self) -> Option<Rect>;

    fn set_marker_visible(&mut self, visible: bool);

    fn metrics(&self) -> ViewportMetrics;

    /// Scroll horizontally. Implementations clamp to their valid scroll range.
    fn set_scroll_left(&mut self, scroll_left: f64);
}
