use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::schema::{StoreFile, STORE_VERSION};
use crate::{KeyValueStore, StoreError};

/// Key-value store persisted as a single JSON document.
///
/// The whole document is read once on [`JsonFileStore::open`] and rewritten on every
/// [`KeyValueStore::set`] through a sibling temp file plus rename, so a crash mid-write
/// leaves either the old or the new document on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    file: StoreFile,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; it is created on the
    /// first write.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let path = path.to_path_buf();
        let file = match fs::read_to_string(&path) {
            Ok(raw) => parse_store_file(&path, &raw)?,
            Err(source) if source.kind() == ErrorKind::NotFound => StoreFile::default(),
            Err(source) => return Err(StoreError::io("reading store file", &path, source)),
        };

        Ok(Self { path, file })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, file: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|source| StoreError::io("creating store directory", parent, source))?;
            }
        }

        let body = serde_json::to_string_pretty(file)
            .map_err(|source| StoreError::json_serialize(&self.path, source))?;
        let tmp_path = temp_path_for(&self.path);
        fs::write(&tmp_path, body)
            .map_err(|source| StoreError::io("writing store temp file", &tmp_path, source))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|source| StoreError::io("replacing store file", &self.path, source))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.file.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.file.entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }

        // Memory only changes once the new document is on disk.
        let mut next = self.file.clone();
        next.entries.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        self.file = next;
        Ok(())
    }
}

pub(crate) fn parse_store_file(path: &Path, raw: &str) -> Result<StoreFile, StoreError> {
    if raw.trim().is_empty() {
        return Ok(StoreFile::default());
    }

    let file = serde_json::from_str::<StoreFile>(raw)
        .map_err(|source| StoreError::json_parse(path, source))?;
    if file.version != STORE_VERSION {
        return Err(StoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: file.version,
            expected: STORE_VERSION,
        });
    }

    Ok(file)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{parse_store_file, temp_path_for};
    use crate::StoreError;

    #[test]
    fn blank_file_parses_as_empty_store() {
        let file = parse_store_file(Path::new("state.json"), "  \n").unwrap();
        assert!(file.entries.is_empty());
    }

    #[test]
    fn future_version_is_rejected() {
        let err = parse_store_file(Path::new("state.json"), r#"{"version":2,"entries":{}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedVersion {
                found: 2,
                expected: 1,
                ..
            }
        ));
    }

    #[test]
    fn temp_path_is_a_sibling() {
        assert_eq!(
            temp_path_for(Path::new("/state/preview.json")),
            Path::new("/state/preview.json.tmp")
        );
    }
}
