//! Cancellable one-shot timers on a virtual clock.
//!
//! The host pumps elapsed time in through [`TimerQueue::pop_due`]/[`TimerQueue::settle`];
//! nothing here sleeps or spawns, which keeps the engine single-threaded and makes
//! timer-driven behavior reproducible in tests.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Handle returned by [`TimerQueue::schedule`]; pass it back to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    id: TimerId,
    due: Duration,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn due(&self) -> Duration {
        self.due
    }
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    pending: Vec<TimerHandle>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|handle| handle.id == id)
    }

    pub fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.schedule_at(self.now.saturating_add(delay))
    }

    /// Schedule at an absolute clock time.
    pub fn schedule_at(&mut self, due: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle {
            id: TimerId(self.next_id),
            due,
        };
        self.pending.push(handle);
        handle
    }

    /// Returns whether the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.id != handle.id);
        self.pending.len() != before
    }

    /// Remove and return the earliest timer due at or before `until`, moving the
    /// clock to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let (index, handle) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, handle)| handle.due <= until)
            .min_by_key(|(_, handle)| (handle.due, handle.id))
            .map(|(index, handle)| (index, *handle))?;
        self.pending.remove(index);
        self.now = self.now.max(handle.due);
        Some(handle.id)
    }

    /// Move the clock to `until` once every due timer has been popped.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
