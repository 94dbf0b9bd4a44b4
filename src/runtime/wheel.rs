//! Wheel-to-horizontal-scroll remapping.
//!
//! Vertical text columns scroll sideways, but wheels and trackpads mostly produce
//! vertical deltas. Vertical motion is turned into horizontal scroll; a dominant
//! horizontal swipe is added on top. Holding the zoom modifier leaves the event to
//! the platform.

use bitflags::bitflags;

use crate::render::surface::ViewportMetrics;

/// Pixels per wheel line.
pub const LINE_PIXELS: f64 = 16.0;
/// Page height used when neither the container nor the window reports one.
pub const FALLBACK_PAGE_PIXELS: f64 = 800.0;

bitflags! {
    /// Modifier keys held during a wheel event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Modifier that turns the wheel into a zoom gesture.
pub const ZOOM_MODIFIER: Modifiers = Modifiers::CTRL;

/// Unit of the reported deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    /// Map a DOM `deltaMode` code. Unknown codes are treated as pixels.
    pub fn from_dom(code: u32) -> Self {
        match code {
            1 => Self::Line,
            2 => Self::Page,
            _ => Self::Pixel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelEvent {
    pub delta_x: f64,
    pub delta_y: f64,
    pub mode: DeltaMode,
    pub modifiers: Modifiers,
}

impl WheelEvent {
    pub fn new(delta_x: f64, delta_y: f64, mode: DeltaMode) -> Self {
        Self {
            delta_x,
            delta_y,
            mode,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Wheel deltas in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelOutcome {
    /// Not intercepted: the platform handles the event (zoom) and the default
    /// action is not suppressed.
    Native,
    /// Intercepted: apply the increments to `scroll_left` in order and suppress the
    /// default vertical scroll.
    Horizontal {
        from_vertical: f64,
        from_horizontal: Option<f64>,
    },
}

impl WheelOutcome {
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Horizontal { .. })
    }

    /// Sum of all horizontal increments.
    pub fn total(&self) -> f64 {
        match *self {
            Self::Native => 0.0,
            Self::Horizontal {
                from_vertical,
                from_horizontal,
            } => from_vertical + from_horizontal.unwrap_or(0.0),
        }
    }
}

/// Convert reported deltas to pixels.
pub fn normalize_delta(event: &WheelEvent, metrics: &ViewportMetrics) -> WheelDelta {
    let factor = match event.mode {
        DeltaMode::Pixel => 1.0,
        DeltaMode::Line => LINE_PIXELS,
        DeltaMode::Page => page_pixels(metrics),
    };
    WheelDelta {
        x: event.delta_x * factor,
        y: event.delta_y * factor,
    }
}

pub fn remap_wheel(event: &WheelEvent, metrics: &ViewportMetrics) -> WheelOutcome {
    if event.modifiers.contains(ZOOM_MODIFIER) {
        return WheelOutcome::Native;
    }

    let delta = normalize_delta(event, metrics);
    let from_horizontal = (delta.x.abs() > delta.y.abs()).then_some(delta.x);
    WheelOutcome::Horizontal {
        from_vertical: delta.y,
        from_horizontal,
    }
}

fn page_pixels(metrics: &ViewportMetrics) -> f64 {
    [metrics.client_height, metrics.inner_height]
        .into_iter()
        .find(|height| height.is_finite() && *height > 0.0)
        .unwrap_or(FALLBACK_PAGE_PIXELS)
}
