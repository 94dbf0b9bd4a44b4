//! Persisted scroll offset for the `none` viewport policy.
//!
//! Scroll events only mark the offset dirty; the write happens on the next animation
//! frame, so a fling of scroll events costs one storage write per frame. Storage
//! failures read as "nothing persisted".

use preview_store::KeyValueStore;
use tracing::warn;

/// Storage key holding the last user scroll offset.
pub const SCROLL_STORAGE_KEY: &str = "vertical-preview.scrollLeft";

#[derive(Debug)]
pub struct ScrollMemory<K> {
    store: K,
    key: String,
    tracking: bool,
    write_pending: bool,
}

impl<K: KeyValueStore> ScrollMemory<K> {
    pub fn new(store: K) -> Self {
        Self::with_key(store, SCROLL_STORAGE_KEY)
    }

    pub fn with_key(store: K, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            tracking: false,
            write_pending: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn into_store(self) -> K {
        self.store
    }

    /// Enable or disable persistence of user scrolls. Disabling drops any write that
    /// has not been flushed yet.
    pub fn set_tracking(&mut self, tracking: bool) {
        self.tracking = tracking;
        if !tracking {
            self.write_pending = false;
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn write_pending(&self) -> bool {
        self.write_pending
    }

    /// Last persisted offset, if any was stored and parses as a finite number.
    pub fn restore(&self) -> Option<f64> {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw?,
            Err(error) => {
                warn!(key = %self.key, %error, "scroll offset read failed");
                return None;
            }
        };
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                warn!(key = %self.key, raw = %raw, "ignoring unparseable scroll offset");
                None
            }
        }
    }

    /// Record a scroll event. Returns whether an animation-frame flush is needed.
    pub fn note_scroll(&mut self) -> bool {
        if !self.tracking || self.write_pending {
            return false;
        }
        self.write_pending = true;
        true
    }

    /// Write `scroll_left` if a scroll happened since the last frame. Returns whether
    /// a write was attempted.
    pub fn flush(&mut self, scroll_left: f64) -> bool {
        if !self.write_pending {
            return false;
        }
        self.write_pending = false;
        let value = format_offset(scroll_left);
        if let Err(error) = self.store.set(&self.key, &value) {
            warn!(key = %self.key, %error, "scroll offset write failed");
        }
        true
    }
}

/// Shortest decimal form, `-240` rather than `-240.0`.
pub fn format_offset(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}
