//! Object logging tests: inline/offload decision, tabular offload, and the
//! retrieval surface over the resulting files.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use runlog::{
    configure, get_artifact_metadata, get_detail, get_logger, get_overview, log_object, log_table,
    ArtifactStore, LogConfig, ObjectRepr, ReaderConfig, Severity, Table,
};
use serde_json::json;
use tempfile::TempDir;

static LOCK: Mutex<()> = Mutex::new(());

fn serialized() -> MutexGuard<'static, ()> {
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn configure_in(dir: &Path) -> LogConfig {
    let config = LogConfig::new("obj-app", dir)
        .with_run_id("obj-run")
        .with_console(None);
    configure(config.clone()).unwrap();
    config
}

fn object_events(config: &LogConfig) -> Vec<serde_json::Value> {
    runlog::load_detail_entries(&config.detail_path())
        .into_iter()
        .filter_map(|record| match record {
            runlog::DetailRecord::Parsed(map) => Some(serde_json::Value::Object(map)),
            runlog::DetailRecord::Degraded { .. } => None,
        })
        .filter(|v| v["event"] == "object")
        .collect()
}

// =============================================================================
// Inline vs offload
// =============================================================================

#[test]
fn small_values_are_logged_inline() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    let config = configure_in(dir.path());
    let store = ArtifactStore::new(dir.path().join("artifacts")).unwrap();

    let logger = get_logger("objects", None, None);
    let record = log_object(&logger, "summary", &json!({"rows": 10}), &store, None);

    assert_eq!(record.repr, ObjectRepr::Inline);
    assert!(record.artifact.is_none());
    // Nothing was offloaded.
    assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 0);

    let events = object_events(&config);
    assert_eq!(events[0]["repr"], "inline");
    assert_eq!(events[0]["key"], "summary");
    assert_eq!(events[0]["value"]["rows"], 10);
}

#[test]
fn large_values_are_offloaded_with_stable_hashes() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    let config = configure_in(dir.path());
    let store = ArtifactStore::new(dir.path().join("artifacts")).unwrap();
    let logger = get_logger("objects", None, None);

    let big: Vec<String> = (0..500).map(|i| format!("row-{i:08}")).collect();
    let first = log_object(&logger, "rows", &big, &store, None);
    let second = log_object(&logger, "rows", &big, &store, None);

    assert_eq!(first.repr, ObjectRepr::Artifact);
    let first_meta = first.artifact.unwrap();
    let second_meta = second.artifact.unwrap();
    // Idempotent content addressing: identical bytes, identical artifact.
    assert_eq!(first_meta.content_hash, second_meta.content_hash);
    assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 1);

    let events = object_events(&config);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["repr"], "artifact");
    assert_eq!(
        events[0]["content_hash"].as_str().unwrap(),
        first_meta.content_hash
    );
    assert!(events[0]["value"].is_null());
}

#[test]
fn threshold_boundary_is_inclusive_for_inline() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    configure_in(dir.path());
    let store = ArtifactStore::new(dir.path().join("artifacts")).unwrap();
    let logger = get_logger("objects", None, None);

    // "xxxx..." serializes to 10 bytes with quotes.
    let value = "x".repeat(8);
    let at_limit = log_object(&logger, "exact", &value, &store, Some(10));
    let over_limit = log_object(&logger, "over", &value, &store, Some(9));

    assert_eq!(at_limit.repr, ObjectRepr::Inline);
    assert_eq!(over_limit.repr, ObjectRepr::Artifact);
}

// =============================================================================
// Tabular offload
// =============================================================================

#[test]
fn tables_offload_as_columnar_msgpack() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    let config = configure_in(dir.path());
    let store = ArtifactStore::new(dir.path().join("artifacts")).unwrap();
    let logger = get_logger("objects", None, None);

    let table = Table {
        columns: vec!["id".into(), "name".into()],
        rows: vec![
            vec![json!(1), json!("alpha")],
            vec![json!(2), json!("beta")],
        ],
    };
    let record = log_table(&logger, "catalog", &table, &store);

    assert_eq!(record.repr, ObjectRepr::Table);
    let meta = record.artifact.unwrap();
    assert!(meta.path.ends_with(".msgpack"));

    let events = object_events(&config);
    assert_eq!(events[0]["repr"], "table");
    assert_eq!(events[0]["rows"], 2);
    assert_eq!(events[0]["columns"], 2);
}

#[test]
fn ragged_table_falls_back_to_json_offload() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    configure_in(dir.path());
    let store = ArtifactStore::new(dir.path().join("artifacts")).unwrap();
    let logger = get_logger("objects", None, None);

    let table = Table {
        columns: vec!["a".into(), "b".into()],
        rows: vec![vec![json!(1), json!(2)], vec![json!(3)]],
    };
    let record = log_table(&logger, "ragged", &table, &store);

    // Conversion failure does not raise; the JSON path takes over.
    assert_eq!(record.repr, ObjectRepr::Artifact);
    assert!(record.artifact.unwrap().path.ends_with(".json"));
}

// =============================================================================
// Retrieval surface
// =============================================================================

#[test]
fn retrieval_reads_back_what_logging_wrote() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    let config = configure_in(dir.path());
    let logger = get_logger("retrieval", None, None);

    logger.info("first line");
    logger
        .event(Severity::Info, "tagged")
        .field("id", "evt-9")
        .emit();

    let reader = ReaderConfig::new(config.overview_path(), 100);
    let page = get_overview(&reader, None);
    assert_eq!(page.lines.len(), 2);
    assert!(page.error.is_none());

    let all = get_detail(&config.detail_path(), 100, None);
    assert_eq!(all.len(), 2);

    let filtered = get_detail(&config.detail_path(), 100, Some("evt-9"));
    assert_eq!(filtered.len(), 1);
    assert_eq!(*filtered[0].get("message").unwrap(), "tagged");
}

#[test]
fn artifact_metadata_reads_degrade_gracefully() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();

    assert!(get_artifact_metadata(&dir.path().join("absent.json")).is_none());

    let good = dir.path().join("meta.json");
    std::fs::write(&good, r#"{"rows": 2}"#).unwrap();
    assert_eq!(get_artifact_metadata(&good).unwrap()["rows"], 2);

    let bad = dir.path().join("broken.json");
    std::fs::write(&bad, "{not json").unwrap();
    let degraded = get_artifact_metadata(&bad).unwrap();
    assert_eq!(degraded["raw"], "{not json");
}
