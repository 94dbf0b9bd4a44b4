use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const STORE_VERSION: u32 = 1;

/// On-disk layout of a [`crate::JsonFileStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreFile {
    pub version: u32,
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl StoreFile {
    #[must_use]
    pub fn v1(entries: BTreeMap<String, String>) -> Self {
        Self {
            version: STORE_VERSION,
            entries,
        }
    }
}

impl Default for StoreFile {
    fn default() -> Self {
        Self::v1(BTreeMap::new())
    }
}
