//! Durable key-value storage for preview view state.
//!
//! The preview engine only ever needs string keys mapped to string values, so the
//! capability is kept deliberately small: [`KeyValueStore::get`] and
//! [`KeyValueStore::set`]. Two backends ship here: an in-process [`MemoryStore`] and a
//! JSON-file-backed [`JsonFileStore`] that survives process restarts.

mod error;
mod file;
mod memory;
mod schema;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use schema::{StoreFile, STORE_VERSION};

/// String key-value capability injected into the preview engine.
pub trait KeyValueStore {
    /// Look up `key`. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
