//! Vertical (tategaki) preview engine.
//!
//! Invariant: one snapshot in, one full re-render out. The engine never patches the
//! previous paragraph list; every update clears the display surface and rebuilds it.
//!
//! # Public API Overview
//! - Feed host messages or [`Snapshot`]s to a [`PreviewEngine`] and drain them.
//! - Implement [`DisplaySurface`] for a real view, or use [`HeadlessSurface`].
//! - Persist the user's scroll position through any [`KeyValueStore`].
//! - Hold a [`PreviewLease`] (or an [`ActivePreview`]) to claim the single preview.

#![allow(clippy::derivable_impls, clippy::unnecessary_map_or)]

pub mod config;
pub mod error;
pub mod host;
pub mod logging;

pub mod core;
pub mod render;
pub mod runtime;

/// Errors surfaced to hosts.
pub use crate::error::PreviewError;

/// Environment configuration and host settings.
pub use crate::config::EnvConfig;
pub use crate::host::PreviewSettings;

/// Render input and the message contract.
pub use crate::core::geometry::Rect;
pub use crate::core::protocol::{decode_inbound, HostMessage, Inbound, OutboundMessage};
pub use crate::core::snapshot::{FontStyle, Snapshot, ViewportPolicy};

/// Paragraph model and display surfaces.
pub use crate::render::{DisplaySurface, HeadlessSurface, Paragraph, Span, ViewportMetrics};

/// Engine, registry and input handling.
pub use crate::runtime::blink::BLINK_INTERVAL;
pub use crate::runtime::scroll_memory::SCROLL_STORAGE_KEY;
pub use crate::runtime::wheel::{DeltaMode, Modifiers, WheelEvent, WheelOutcome};
pub use crate::runtime::{ActivePreview, PreviewEngine, PreviewLease, RenderReport};

/// Durable key-value stores.
pub use preview_store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
