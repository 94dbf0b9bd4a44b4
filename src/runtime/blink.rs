//! Cursor blink cycle.
//!
//! `visible` and `hidden` alternate every [`BLINK_INTERVAL`], starting visible right
//! after a render. The controller owns the handle of its single pending transition;
//! restarting cancels it first, so two timers never serve the same marker.

use std::time::Duration;

use tracing::trace;

use crate::render::surface::DisplaySurface;
use crate::runtime::timer::{TimerHandle, TimerId, TimerQueue};

pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
pub struct BlinkController {
    shown: Option<bool>,
    next_visible: bool,
    timer: Option<TimerHandle>,
}

impl BlinkController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh cycle for the marker that was just rendered.
    pub fn restart<S: DisplaySurface + ?Sized>(
        &mut self,
        timers: &mut TimerQueue,
        surface: &mut S,
        has_marker: bool,
    ) {
        self.stop(timers);
        if !has_marker {
            return;
        }
        self.next_visible = true;
        self.step(timers, surface);
    }

    /// Cancel the pending transition, if any.
    pub fn stop(&mut self, timers: &mut TimerQueue) {
        if let Some(handle) = self.timer.take() {
            timers.cancel(handle);
        }
        self.shown = None;
    }

    /// Handle a fired timer. Timers that do not belong to the current cycle are
    /// ignored; returns whether a transition happened.
    pub fn on_timer<S: DisplaySurface + ?Sized>(
        &mut self,
        id: TimerId,
        timers: &mut TimerQueue,
        surface: &mut S,
    ) -> bool {
        if self.timer.map(|handle| handle.id()) != Some(id) {
            return false;
        }
        self.timer = None;
        self.step(timers, surface);
        true
    }

    /// Apply every transition due by `until` in one step: the phase lands where
    /// `n` individual transitions would have left it, and the next transition is
    /// scheduled one interval after the last one due. Returns `n`.
    pub fn advance<S: DisplaySurface + ?Sized>(
        &mut self,
        until: Duration,
        timers: &mut TimerQueue,
        surface: &mut S,
    ) -> u64 {
        let Some(handle) = self.timer else {
            return 0;
        };
        if handle.due() > until {
            return 0;
        }

        let interval = BLINK_INTERVAL.as_nanos();
        let overdue = (until - handle.due()).as_nanos();
        let transitions = overdue / interval + 1;
        // `overdue % interval` is below one interval, so it fits in u64 nanoseconds.
        let since_last = Duration::from_nanos((overdue % interval) as u64);
        let last = until - since_last;

        timers.cancel(handle);
        let visible = if transitions % 2 == 1 {
            self.next_visible
        } else {
            !self.next_visible
        };
        surface.set_marker_visible(visible);
        self.shown = Some(visible);
        self.next_visible = !visible;
        self.timer = Some(timers.schedule_at(last.saturating_add(BLINK_INTERVAL)));
        let due = u64::try_from(transitions).unwrap_or(u64::MAX);
        trace!(visible, transitions = due, "cursor blink");
        due
    }

    /// Current marker visibility, `None` when no cycle is running.
    pub fn visible(&self) -> Option<bool> {
        self.shown
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    fn step<S: DisplaySurface + ?Sized>(&mut self, timers: &mut TimerQueue, surface: &mut S) {
        let visible = self.next_visible;
        surface.set_marker_visible(visible);
        self.shown = Some(visible);
        self.next_visible = !visible;
        self.timer = Some(timers.schedule(BLINK_INTERVAL));
        trace!(visible, at_ms = timers.now().as_millis() as u64, "cursor blink");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{BlinkController, BLINK_INTERVAL};
    use crate::render::headless::HeadlessSurface;
    use crate::runtime::timer::TimerQueue;

    fn pump(
        blink: &mut BlinkController,
        timers: &mut TimerQueue,
        surface: &mut HeadlessSurface,
        elapsed: Duration,
    ) -> usize {
        let until = timers.now() + elapsed;
        let mut fired = 0;
        while let Some(id) = timers.pop_due(until) {
            if blink.on_timer(id, timers, surface) {
                fired += 1;
            }
        }
        timers.settle(until);
        fired
    }

    #[test]
    fn alternates_every_interval_starting_visible() {
        let mut blink = BlinkController::new();
        let mut timers = TimerQueue::new();
        let mut surface = HeadlessSurface::new(100.0, 100.0);

        blink.restart(&mut timers, &mut surface, true);
        assert_eq!(blink.visible(), Some(true));

        assert_eq!(pump(&mut blink, &mut timers, &mut surface, Duration::from_millis(499)), 0);
        assert_eq!(blink.visible(), Some(true));
        assert_eq!(pump(&mut blink, &mut timers, &mut surface, Duration::from_millis(1)), 1);
        assert_eq!(blink.visible(), Some(false));
        assert_eq!(pump(&mut blink, &mut timers, &mut surface, BLINK_INTERVAL * 3), 3);
        assert_eq!(blink.visible(), Some(true));
        assert_eq!(timers.pending_count(), 1);
    }

    #[test]
    fn restart_cancels_the_previous_transition() {
        let mut blink = BlinkController::new();
        let mut timers = TimerQueue::new();
        let mut surface = HeadlessSurface::new(100.0, 100.0);

        blink.restart(&mut timers, &mut surface, true);
        let first = blink.pending_timer().unwrap();
        pump(&mut blink, &mut timers, &mut surface, Duration::from_millis(300));
        blink.restart(&mut timers, &mut surface, true);

        assert!(!timers.is_pending(first.id()));
        assert_eq!(timers.pending_count(), 1);
        // The old timer would have fired at 500ms; the new cycle holds until 800ms.
        assert_eq!(pump(&mut blink, &mut timers, &mut surface, Duration::from_millis(499)), 0);
        assert_eq!(blink.visible(), Some(true));
    }

    #[test]
    fn no_marker_means_no_cycle() {
        let mut blink = BlinkController::new();
        let mut timers = TimerQueue::new();
        let mut surface = HeadlessSurface::new(100.0, 100.0);

        blink.restart(&mut timers, &mut surface, true);
        blink.restart(&mut timers, &mut surface, false);
        assert_eq!(blink.visible(), None);
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn foreign_timer_ids_are_ignored() {
        let mut blink = BlinkController::new();
        let mut timers = TimerQueue::new();
        let mut surface = HeadlessSurface::new(100.0, 100.0);
        let stray = timers.schedule(Duration::from_millis(1));

        blink.restart(&mut timers, &mut surface, true);
        assert!(!blink.on_timer(stray.id(), &mut timers, &mut surface));
        assert_eq!(blink.visible(), Some(true));
    }

    #[test]
    fn advance_jumps_by_parity_and_keeps_the_cadence() {
        let mut blink = BlinkController::new();
        let mut timers = TimerQueue::new();
        let mut surface = HeadlessSurface::new(100.0, 100.0);
        blink.restart(&mut timers, &mut surface, true);

        // Due at 500, 1000, 1500; the next one lands at 2000.
        assert_eq!(blink.advance(Duration::from_millis(1700), &mut timers, &mut surface), 3);
        assert_eq!(blink.visible(), Some(false));
        assert_eq!(
            blink.pending_timer().map(|handle| handle.due()),
            Some(Duration::from_millis(2000))
        );
        assert_eq!(timers.pending_count(), 1);

        assert_eq!(blink.advance(Duration::from_millis(1999), &mut timers, &mut surface), 0);
        assert_eq!(blink.advance(Duration::from_millis(2500), &mut timers, &mut surface), 2);
        assert_eq!(blink.visible(), Some(false));
    }

    #[test]
    fn advance_to_the_end_of_time_does_not_overflow() {
        let mut blink = BlinkController::new();
        let mut timers = TimerQueue::new();
        let mut surface = HeadlessSurface::new(100.0, 100.0);
        blink.restart(&mut timers, &mut surface, true);

        assert!(blink.advance(Duration::MAX, &mut timers, &mut surface) > 1);
        assert!(blink.visible().is_some());
        assert_eq!(timers.pending_count(), 1);
    }
}
