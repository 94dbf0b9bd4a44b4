//! Layout and viewport engine.
//!
//! Owns the display surface, the blink cycle, and the persisted scroll offset.
//! Every render rebuilds the surface from the full snapshot text; nothing is diffed.
//! Render volume is bounded by how fast a person edits or moves the selection, so
//! full replacement is cheap and leaves no stale state between renders.
//!
//! Event sources, all handled run-to-completion on the host's thread:
//! - snapshots: [`PreviewEngine::receive`] / [`PreviewEngine::enqueue`], rendered by
//!   [`PreviewEngine::drain`] (latest wins) or [`PreviewEngine::render`];
//! - blink timers: [`PreviewEngine::tick`];
//! - user input: [`PreviewEngine::on_scroll`], [`PreviewEngine::on_animation_frame`],
//!   [`PreviewEngine::on_wheel`].

use std::time::Duration;

use preview_store::KeyValueStore;
use serde_json::Value;
use tracing::{debug, trace};

use crate::core::cursor::inject_cursor;
use crate::core::geometry::Rect;
use crate::core::protocol::{decode_inbound, decode_inbound_value, Inbound};
use crate::core::snapshot::{Snapshot, ViewportPolicy};
use crate::error::PreviewError;
use crate::render::paragraph::{segment, Paragraph};
use crate::render::surface::DisplaySurface;
use crate::runtime::blink::BlinkController;
use crate::runtime::scroll_memory::ScrollMemory;
use crate::runtime::timer::TimerQueue;
use crate::runtime::viewport::target_scroll;
use crate::runtime::wheel::{remap_wheel, WheelEvent, WheelOutcome};

/// Summary of one render, mostly for hosts that log or test.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub generation: u64,
    pub paragraphs: usize,
    /// Clamped cursor offset, in chars.
    pub cursor_offset: usize,
    pub policy: ViewportPolicy,
    /// Marker bounds measured right after the paragraphs were styled.
    pub marker: Option<Rect>,
    pub scroll_before: f64,
    pub scroll_after: f64,
}

pub struct PreviewEngine<S, K> {
    surface: S,
    scroll: ScrollMemory<K>,
    timers: TimerQueue,
    blink: BlinkController,
    pending: Option<Snapshot>,
    current: Option<Snapshot>,
    paragraphs: Vec<Paragraph>,
    generation: u64,
}

impl<S: DisplaySurface, K: KeyValueStore> PreviewEngine<S, K> {
    pub fn new(surface: S, store: K) -> Self {
        Self::with_scroll_memory(surface, ScrollMemory::new(store))
    }

    pub fn with_scroll_memory(surface: S, scroll: ScrollMemory<K>) -> Self {
        Self {
            surface,
            scroll,
            timers: TimerQueue::new(),
            blink: BlinkController::new(),
            pending: None,
            current: None,
            paragraphs: Vec::new(),
            generation: 0,
        }
    }

    /// Decode a raw host message and queue its snapshot. Returns whether a snapshot
    /// was queued; unrecognized messages are ignored.
    pub fn receive(&mut self, raw: &str) -> Result<bool, PreviewError> {
        let inbound = decode_inbound(raw)?;
        Ok(self.accept(inbound))
    }

    pub fn receive_value(&mut self, value: Value) -> bool {
        self.accept(decode_inbound_value(value))
    }

    /// Queue `snapshot`, superseding any snapshot not yet rendered.
    pub fn enqueue(&mut self, snapshot: Snapshot) {
        if self.pending.replace(snapshot).is_some() {
            trace!("superseded pending snapshot");
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Render the most recent queued snapshot, if any.
    pub fn drain(&mut self) -> Option<RenderReport> {
        let snapshot = self.pending.take()?;
        Some(self.render(&snapshot))
    }

    /// Rebuild the surface for `snapshot` and re-aim the viewport.
    pub fn render(&mut self, snapshot: &Snapshot) -> RenderReport {
        // A scroll not yet flushed belongs to the outgoing render.
        if self.scroll.write_pending() {
            let scroll_left = self.surface.metrics().scroll_left;
            self.scroll.flush(scroll_left);
        }

        let scroll_before = self.surface.metrics().scroll_left;
        let policy = snapshot.viewport_policy;

        let injected = inject_cursor(&snapshot.text, snapshot.cursor_offset, &snapshot.cursor_glyph);
        let paragraphs = segment(&injected);

        self.surface.clear();
        for paragraph in &paragraphs {
            self.surface.append_paragraph(paragraph);
        }
        self.surface.style_all(&snapshot.font_style());

        // The previous marker went away with the old paragraphs.
        let marker = self.surface.marker_bounds();
        self.blink
            .restart(&mut self.timers, &mut self.surface, marker.is_some());

        self.scroll.set_tracking(policy.persists_scroll());
        if policy.persists_scroll() {
            if let Some(saved) = self.scroll.restore() {
                self.surface.set_scroll_left(saved);
            }
        }
        if let Some(rect) = marker {
            if let Some(target) = target_scroll(policy, rect, &self.surface.metrics()) {
                self.surface.set_scroll_left(target);
            }
        }

        self.generation += 1;
        let report = RenderReport {
            generation: self.generation,
            paragraphs: paragraphs.len(),
            cursor_offset: injected.offset,
            policy,
            marker,
            scroll_before,
            scroll_after: self.surface.metrics().scroll_left,
        };
        debug!(
            generation = report.generation,
            paragraphs = report.paragraphs,
            offset = report.cursor_offset,
            policy = policy.as_str(),
            has_marker = marker.is_some(),
            scroll_before,
            scroll_after = report.scroll_after,
            "rendered snapshot"
        );

        self.paragraphs = paragraphs;
        self.current = Some(snapshot.clone());
        report
    }

    /// Advance the blink clock by `elapsed`. Returns how many transitions were due;
    /// a long gap lands on the right phase without replaying each one.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        let until = self.timers.now().saturating_add(elapsed);
        let fired = self
            .blink
            .advance(until, &mut self.timers, &mut self.surface);
        self.timers.settle(until);
        usize::try_from(fired).unwrap_or(usize::MAX)
    }

    /// The surface scrolled. Returns whether the host should schedule an animation
    /// frame for [`PreviewEngine::on_animation_frame`].
    pub fn on_scroll(&mut self) -> bool {
        self.scroll.note_scroll()
    }

    /// Persist the scroll offset if a scroll happened since the last frame.
    pub fn on_animation_frame(&mut self) -> bool {
        let scroll_left = self.surface.metrics().scroll_left;
        self.scroll.flush(scroll_left)
    }

    /// Remap a wheel event to horizontal scrolling. The caller suppresses the
    /// native default when [`WheelOutcome::prevents_default`] says so.
    pub fn on_wheel(&mut self, event: &WheelEvent) -> WheelOutcome {
        let metrics = self.surface.metrics();
        let outcome = remap_wheel(event, &metrics);
        if let WheelOutcome::Horizontal {
            from_vertical,
            from_horizontal,
        } = outcome
        {
            self.scroll_by(from_vertical);
            if let Some(delta) = from_horizontal {
                self.scroll_by(delta);
            }
            if self.surface.metrics().scroll_left != metrics.scroll_left {
                self.on_scroll();
            }
        }
        outcome
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    /// Marker visibility in the running blink cycle.
    pub fn blink_visible(&self) -> Option<bool> {
        self.blink.visible()
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn scroll_memory(&self) -> &ScrollMemory<K> {
        &self.scroll
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn into_parts(self) -> (S, K) {
        let Self { surface, scroll, .. } = self;
        (surface, scroll.into_store())
    }

    fn accept(&mut self, inbound: Inbound) -> bool {
        match inbound {
            Inbound::Update(snapshot) => {
                self.enqueue(snapshot);
                true
            }
            Inbound::Ignored { kind } => {
                trace!(kind = kind.as_deref().unwrap_or("<none>"), "ignored host message");
                false
            }
        }
    }

    fn scroll_by(&mut self, delta: f64) {
        let scroll_left = self.surface.metrics().scroll_left;
        self.surface.set_scroll_left(scroll_left + delta);
    }
}
