//! Log sink installation.
//!
//! The library only emits `tracing` events. A host that wants them on disk calls
//! [`install_from_env`], which writes to the file named by `VERTICAL_PREVIEW_LOG`.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;
use crate::error::PreviewError;

/// Filter used when `VERTICAL_PREVIEW_LOG_FILTER` is unset.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "vertical_preview=debug,preview_store=debug"
    } else {
        "vertical_preview=info,preview_store=info"
    }
}

/// Install a global file subscriber when a log path is configured. Returns whether
/// one was installed.
pub fn install_from_env(config: &EnvConfig) -> Result<bool, PreviewError> {
    let Some(path) = config.log_path.as_deref() else {
        return Ok(false);
    };

    let filter = match config.log_filter.as_deref() {
        Some(directives) => {
            EnvFilter::try_new(directives).map_err(|err| PreviewError::Logging {
                reason: format!("invalid filter {directives:?}: {err}"),
            })?
        }
        None => EnvFilter::new(default_filter(config.debug)),
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| PreviewError::io("opening log file", path, source))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| PreviewError::Logging {
            reason: err.to_string(),
        })?;
    Ok(true)
}
