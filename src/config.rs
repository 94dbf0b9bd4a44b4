//! Environment configuration.

use std::env;
use std::path::Path;

use preview_store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};

pub const DEBUG_ENV: &str = "VERTICAL_PREVIEW_DEBUG";
pub const LOG_PATH_ENV: &str = "VERTICAL_PREVIEW_LOG";
pub const LOG_FILTER_ENV: &str = "VERTICAL_PREVIEW_LOG_FILTER";
pub const STATE_PATH_ENV: &str = "VERTICAL_PREVIEW_STATE";

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub debug: bool,
    pub log_path: Option<String>,
    pub log_filter: Option<String>,
    pub state_path: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            debug: env_flag(DEBUG_ENV),
            log_path: env_string_opt(LOG_PATH_ENV),
            log_filter: env_string_opt(LOG_FILTER_ENV),
            state_path: env_string_opt(STATE_PATH_ENV),
        }
    }

    /// Durable store for view state: the JSON file at `state_path` when set, an
    /// in-memory store otherwise.
    pub fn open_state_store(&self) -> Result<Box<dyn KeyValueStore>, StoreError> {
        match self.state_path.as_deref() {
            Some(path) => Ok(Box::new(JsonFileStore::open(Path::new(path))?)),
            None => Ok(Box::new(MemoryStore::new())),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{EnvConfig, DEBUG_ENV, LOG_FILTER_ENV, LOG_PATH_ENV, STATE_PATH_ENV};
    use std::env;
    use std::sync::{Mutex, OnceLock};

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn env_defaults_are_unset() {
        let _lock = env_lock();
        let _g1 = set_env_guard(DEBUG_ENV, None);
        let _g2 = set_env_guard(LOG_PATH_ENV, None);
        let _g3 = set_env_guard(LOG_FILTER_ENV, None);
        let _g4 = set_env_guard(STATE_PATH_ENV, None);

        let config = EnvConfig::from_env();
        assert!(!config.debug);
        assert!(config.log_path.is_none());
        assert!(config.log_filter.is_none());
        assert!(config.state_path.is_none());
    }

    #[test]
    fn env_values_are_read() {
        let _lock = env_lock();
        let _g1 = set_env_guard(DEBUG_ENV, Some("1"));
        let _g2 = set_env_guard(LOG_PATH_ENV, Some("/tmp/preview.log"));
        let _g3 = set_env_guard(LOG_FILTER_ENV, Some("vertical_preview=trace"));
        let _g4 = set_env_guard(STATE_PATH_ENV, Some("/tmp/preview-state.json"));

        let config = EnvConfig::from_env();
        assert!(config.debug);
        assert_eq!(config.log_path.as_deref(), Some("/tmp/preview.log"));
        assert_eq!(config.log_filter.as_deref(), Some("vertical_preview=trace"));
        assert_eq!(config.state_path.as_deref(), Some("/tmp/preview-state.json"));
    }

    #[test]
    fn blank_values_and_other_flags_are_ignored() {
        let _lock = env_lock();
        let _g1 = set_env_guard(DEBUG_ENV, Some("true"));
        let _g2 = set_env_guard(LOG_PATH_ENV, Some("  "));

        let config = EnvConfig::from_env();
        assert!(!config.debug);
        assert!(config.log_path.is_none());
    }

    #[test]
    fn state_store_follows_state_path() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("state.json");
        let config = EnvConfig {
            state_path: Some(path.display().to_string()),
            ..EnvConfig::default()
        };

        let mut store = config.open_state_store().expect("store should open");
        store.set("k", "v").expect("write should succeed");
        assert!(path.exists());

        let memory = EnvConfig::default().open_state_store().expect("memory store");
        assert_eq!(memory.get("k").unwrap(), None);
    }
}
