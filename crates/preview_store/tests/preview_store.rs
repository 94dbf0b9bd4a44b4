use std::fs;
use std::path::PathBuf;

use preview_store::{JsonFileStore, KeyValueStore, StoreError, StoreFile};
use tempfile::TempDir;

fn store_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("nested").join("preview-state.json");
    (dir, path)
}

#[test]
fn missing_file_opens_as_empty_store() {
    let (_dir, path) = store_path();
    let store = JsonFileStore::open(&path).expect("missing file should open");

    assert_eq!(store.get("vertical-preview.scrollLeft").unwrap(), None);
    assert!(!path.exists(), "open must not create the file");
}

#[test]
fn values_survive_reopen() {
    let (_dir, path) = store_path();
    {
        let mut store = JsonFileStore::open(&path).expect("store should open");
        store
            .set("vertical-preview.scrollLeft", "-240")
            .expect("write should succeed");
    }

    let reopened = JsonFileStore::open(&path).expect("store should reopen");
    assert_eq!(
        reopened.get("vertical-preview.scrollLeft").unwrap().as_deref(),
        Some("-240")
    );

    let raw = fs::read_to_string(&path).expect("store file should exist");
    let parsed: StoreFile = serde_json::from_str(&raw).expect("store file should be JSON");
    assert_eq!(parsed.version, 1);
    assert!(!path.with_file_name("preview-state.json.tmp").exists());
}

#[test]
fn corrupt_file_reports_parse_error() {
    let (_dir, path) = store_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{not json").unwrap();

    let err = JsonFileStore::open(&path).expect_err("corrupt file should fail");
    assert!(matches!(err, StoreError::JsonParse { .. }));
    assert!(err.to_string().contains("preview-state.json"));
}

#[test]
fn boxed_store_forwards_calls() {
    let (_dir, path) = store_path();
    let mut store: Box<dyn KeyValueStore> =
        Box::new(JsonFileStore::open(&path).expect("store should open"));

    store.set("a", "1").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
}

#[test]
fn failed_write_is_retried_with_the_same_value() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let blocker = dir.path().join("blocker");
    let path = blocker.join("state.json");
    let mut store = JsonFileStore::open(&path).expect("missing file should open");

    fs::write(&blocker, "not a directory").expect("blocker file should be written");
    assert!(store.set("vertical-preview.scrollLeft", "-240").is_err());
    assert_eq!(store.get("vertical-preview.scrollLeft").unwrap(), None);

    fs::remove_file(&blocker).expect("blocker should be removed");
    store
        .set("vertical-preview.scrollLeft", "-240")
        .expect("retry should write");
    assert!(path.exists());

    let reopened = JsonFileStore::open(&path).expect("store should reopen");
    assert_eq!(
        reopened.get("vertical-preview.scrollLeft").unwrap().as_deref(),
        Some("-240")
    );
}
