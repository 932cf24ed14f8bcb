//! Dual-sink logger integration tests: configuration, routing, context
//! propagation.
//!
//! Configuration is process-global, so every test that touches it runs under
//! one lock and configures its own temp directory.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use runlog::{configure, get_logger, load_detail_entries, LogConfig, Severity};
use tempfile::TempDir;

static LOCK: Mutex<()> = Mutex::new(());

fn serialized() -> MutexGuard<'static, ()> {
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn test_config(dir: &Path) -> LogConfig {
    LogConfig::new("test-app", dir).with_console(None)
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn configure_creates_directory_and_returns_supplied_run_id() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    let log_dir = dir.path().join("nested").join("logs");

    let run_id = configure(test_config(&log_dir).with_run_id("run-abc")).unwrap();

    assert_eq!(run_id, "run-abc");
    assert!(log_dir.is_dir());
}

#[test]
fn configure_generates_run_id_when_absent() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();

    let run_id = configure(test_config(dir.path())).unwrap();

    assert!(!run_id.is_empty());
    assert_eq!(runlog::current().unwrap().run_id, run_id);
}

#[test]
fn configure_fails_when_directory_cannot_be_created() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file in the way").unwrap();

    let result = configure(test_config(&blocker.join("logs")));

    assert!(result.is_err());
}

// =============================================================================
// Context propagation (every event carries the configured pair)
// =============================================================================

#[test]
fn events_carry_configured_context_in_both_streams() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path()).with_run_id("run-77");
    configure(config.clone()).unwrap();

    let logger = get_logger("pipeline.load", None, None);
    logger.info("loaded 3 shards");

    let overview = read_lines(&config.overview_path());
    assert_eq!(overview.len(), 1);
    assert!(overview[0].contains("INFO [test-app:run-77] pipeline.load - loaded 3 shards"));

    let records = load_detail_entries(&config.detail_path());
    assert_eq!(records.len(), 1);
    assert_eq!(*records[0].get("app").unwrap(), "test-app");
    assert_eq!(*records[0].get("run_id").unwrap(), "run-77");
    assert_eq!(*records[0].get("logger").unwrap(), "pipeline.load");
    assert_eq!(*records[0].get("message").unwrap(), "loaded 3 shards");
}

#[test]
fn explicit_logger_context_overrides_registry() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path()).with_run_id("registry-run");
    configure(config.clone()).unwrap();

    let logger = get_logger("override", Some("other-app"), Some("other-run"));
    logger.info("hello");

    let records = load_detail_entries(&config.detail_path());
    assert_eq!(*records[0].get("app").unwrap(), "other-app");
    assert_eq!(*records[0].get("run_id").unwrap(), "other-run");
}

// =============================================================================
// Severity routing
// =============================================================================

#[test]
fn sinks_filter_by_independent_thresholds() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path()).with_levels(Severity::Info, Severity::Debug);
    configure(config.clone()).unwrap();

    let logger = get_logger("thresholds", None, None);
    logger.debug("detail only");
    logger.info("both streams");
    logger.trace("neither stream");

    let overview = read_lines(&config.overview_path());
    assert_eq!(overview.len(), 1);
    assert!(overview[0].contains("both streams"));

    let records = load_detail_entries(&config.detail_path());
    let messages: Vec<_> = records
        .iter()
        .filter_map(|r| r.get("message").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(messages, vec!["detail only", "both streams"]);
}

// =============================================================================
// Structured fields and append semantics
// =============================================================================

#[test]
fn structured_fields_merge_into_detail_json() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    configure(config.clone()).unwrap();

    let logger = get_logger("fields", None, None);
    logger
        .event(Severity::Info, "custom event")
        .kind("checkpoint")
        .field("shard", 4_u32)
        .field("ratio", 0.25_f64)
        .emit();

    let records = load_detail_entries(&config.detail_path());
    assert_eq!(*records[0].get("event").unwrap(), "checkpoint");
    assert_eq!(*records[0].get("shard").unwrap(), 4);
    assert_eq!(*records[0].get("ratio").unwrap(), 0.25);
}

#[test]
fn attached_errors_become_exception_field() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    configure(config.clone()).unwrap();

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "shard missing");
    get_logger("errors", None, None)
        .event(Severity::Error, "load failed")
        .error(&err)
        .emit();

    let records = load_detail_entries(&config.detail_path());
    let exception = records[0].get("exception").unwrap().as_str().unwrap();
    assert!(exception.contains("shard missing"));
}

#[test]
fn reconfiguring_appends_instead_of_truncating() {
    let _guard = serialized();
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path()).with_run_id("first");
    configure(config.clone()).unwrap();
    get_logger("restart", None, None).info("before restart");

    configure(test_config(dir.path()).with_run_id("second")).unwrap();
    get_logger("restart", None, None).info("after restart");

    let overview = read_lines(&config.overview_path());
    assert_eq!(overview.len(), 2);
    assert!(overview[0].contains("before restart"));
    assert!(overview[1].contains("after restart"));
}
