//! Crate error type.
//!
//! Only failures a host can act on are surfaced here. Render-path problems (bad
//! snapshot fields, out-of-range offsets, storage hiccups) degrade silently and are
//! logged instead.

use std::path::PathBuf;

use preview_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("malformed host message: {source}")]
    MalformedMessage {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("a vertical preview is already active (lease {lease})")]
    AlreadyActive { lease: u64 },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install log subscriber: {reason}")]
    Logging { reason: String },
}

impl PreviewError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn encode(what: &'static str, source: serde_json::Error) -> Self {
        Self::Encode { what, source }
    }
}
