//! Artifact store tests: content addressing and write-once semantics.

use runlog::ArtifactStore;
use tempfile::TempDir;

#[test]
fn put_bytes_names_file_by_content_hash() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path().join("artifacts")).unwrap();

    let meta = store.put_bytes(b"payload bytes", ".bin").unwrap();

    assert_eq!(meta.byte_size, 13);
    assert_eq!(meta.content_hash.len(), 64);
    assert!(meta.content_hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(meta.path.ends_with(&format!("{}.bin", meta.content_hash)));
    assert_eq!(std::fs::read(&meta.path).unwrap(), b"payload bytes");
}

#[test]
fn identical_content_is_stored_once() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path().join("artifacts")).unwrap();

    let first = store.put_bytes(b"same bytes", ".bin").unwrap();
    let second = store.put_bytes(b"same bytes", ".bin").unwrap();

    assert_eq!(first, second);
    let entries = std::fs::read_dir(store.root()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn different_content_gets_different_names() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path().join("artifacts")).unwrap();

    let a = store.put_bytes(b"aaa", ".bin").unwrap();
    let b = store.put_bytes(b"bbb", ".bin").unwrap();

    assert_ne!(a.content_hash, b.content_hash);
    assert_ne!(a.path, b.path);
}

#[test]
fn put_json_is_stable_across_field_order() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path().join("artifacts")).unwrap();

    let first = store
        .put_json(&serde_json::json!({"b": 2, "a": 1}))
        .unwrap();
    let second = store
        .put_json(&serde_json::json!({"a": 1, "b": 2}))
        .unwrap();

    assert_eq!(first.content_hash, second.content_hash);
    assert!(first.path.ends_with(".json"));
}
