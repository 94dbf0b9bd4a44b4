//! Process-wide single-preview registry.
//!
//! At most one preview is active per process. A [`PreviewLease`] is the proof of
//! ownership; dropping it (or calling [`PreviewLease::release`]) frees the slot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use preview_store::KeyValueStore;
use tracing::debug;

use crate::error::PreviewError;
use crate::render::surface::DisplaySurface;
use crate::runtime::engine::PreviewEngine;

static ACTIVE_LEASE: Lazy<Mutex<Option<u64>>> = Lazy::new(|| Mutex::new(None));
static NEXT_LEASE_ID: AtomicU64 = AtomicU64::new(1);

fn active_slot() -> MutexGuard<'static, Option<u64>> {
    ACTIVE_LEASE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Id of the lease currently holding the preview slot.
pub fn active_lease() -> Option<u64> {
    *active_slot()
}

#[derive(Debug)]
pub struct PreviewLease {
    id: u64,
}

impl PreviewLease {
    /// Claim the preview slot. Fails while another lease holds it.
    pub fn acquire() -> Result<Self, PreviewError> {
        let mut slot = active_slot();
        if let Some(lease) = *slot {
            return Err(PreviewError::AlreadyActive { lease });
        }
        let id = NEXT_LEASE_ID.fetch_add(1, Ordering::Relaxed);
        *slot = Some(id);
        debug!(lease = id, "preview lease acquired");
        Ok(Self { id })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn release(self) {}
}

impl Drop for PreviewLease {
    fn drop(&mut self) {
        let mut slot = active_slot();
        if *slot == Some(self.id) {
            *slot = None;
            debug!(lease = self.id, "preview lease released");
        }
    }
}

/// The active preview: its lease plus the engine it guards.
pub struct ActivePreview<S, K> {
    lease: PreviewLease,
    engine: PreviewEngine<S, K>,
}

impl<S: DisplaySurface, K: KeyValueStore> ActivePreview<S, K> {
    pub fn open(surface: S, store: K) -> Result<Self, PreviewError> {
        let lease = PreviewLease::acquire()?;
        Ok(Self {
            lease,
            engine: PreviewEngine::new(surface, store),
        })
    }

    pub fn lease_id(&self) -> u64 {
        self.lease.id()
    }

    pub fn engine(&self) -> &PreviewEngine<S, K> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PreviewEngine<S, K> {
        &mut self.engine
    }

    /// Release the slot and hand back the surface and store.
    pub fn close(self) -> (S, K) {
        let Self { lease, engine } = self;
        lease.release();
        engine.into_parts()
    }
}
