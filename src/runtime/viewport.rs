//! Cursor-following viewport policies.
//!
//! Given the marker's viewport-relative bounds and the current metrics, compute the
//! horizontal scroll offset a policy wants. Results are not clamped; the display
//! surface owns its scroll range.

use crate::core::geometry::Rect;
use crate::core::snapshot::ViewportPolicy;
use crate::render::surface::ViewportMetrics;

/// Marker widths kept between the marker and the leading edge under `left`.
pub const LEFT_MARGIN_WIDTHS: f64 = 3.0;

/// Target `scroll_left` for `policy`, or `None` when the policy leaves the scroll
/// offset alone.
pub fn target_scroll(
    policy: ViewportPolicy,
    marker: Rect,
    metrics: &ViewportMetrics,
) -> Option<f64> {
    let scroll = metrics.scroll_left;
    match policy {
        ViewportPolicy::None => None,
        ViewportPolicy::Inner => inner_scroll(marker, metrics),
        ViewportPolicy::Right => Some(scroll + marker.left - metrics.client_width),
        ViewportPolicy::Center => Some(
            scroll + marker.left - marker.width - metrics.client_width
                + metrics.inner_width / 2.0,
        ),
        ViewportPolicy::Left => Some(
            scroll + marker.left - marker.width * LEFT_MARGIN_WIDTHS - metrics.client_width
                + metrics.inner_width,
        ),
    }
}

/// Minimal correction: pull the marker back in when it sits within half its width
/// of the leading edge, or past the trailing edge.
fn inner_scroll(marker: Rect, metrics: &ViewportMetrics) -> Option<f64> {
    let mut scroll = metrics.scroll_left;
    let mut moved = false;
    if marker.left < marker.width / 2.0 {
        scroll -= marker.width - marker.left;
        moved = true;
    }
    if marker.left > metrics.client_width {
        scroll += marker.left - metrics.client_width;
        moved = true;
    }
    moved.then_some(scroll)
}
