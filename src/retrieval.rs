//! Read-back surface consumed by an external UI/HTTP layer.
//!
//! Everything here is a pure read over the files the sinks append to; the
//! transport on top (HTTP, CLI, polling policy) is the caller's concern.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::analytics::{self, DetailRecord};
use crate::tail::{self, TailPage};

/// Where the retrieval surface reads from.
///
/// Built from explicit parameters; sourcing these from the environment is
/// the deployment layer's job.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub overview_path: PathBuf,
    pub detail_path: Option<PathBuf>,
    pub artifact_path: Option<PathBuf>,
    /// Cap on lines/records returned per call.
    pub max_entries: usize,
}

impl ReaderConfig {
    pub fn new(overview_path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            overview_path: overview_path.into(),
            detail_path: None,
            artifact_path: None,
            max_entries,
        }
    }

    pub fn with_detail_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.detail_path = Some(path.into());
        self
    }

    pub fn with_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = Some(path.into());
        self
    }
}

/// Incrementally read the overview stream from a caller-held cursor.
pub fn get_overview(config: &ReaderConfig, offset: Option<u64>) -> TailPage {
    tail::read_overview(&config.overview_path, offset, config.max_entries)
}

/// Read the most recent detail records, optionally filtered by `id`.
///
/// The last `max_entries` lines are parsed tolerantly: unparseable lines
/// come back as degraded records. The id filter string-compares against a
/// record's `id` field, accepting numbers as well as strings.
pub fn get_detail(path: &Path, max_entries: usize, id_filter: Option<&str>) -> Vec<DetailRecord> {
    let mut records = analytics::load_detail_entries(path);
    if max_entries > 0 && records.len() > max_entries {
        records.drain(..records.len() - max_entries);
    }

    match id_filter {
        None => records,
        Some(id) => records
            .into_iter()
            .filter(|record| record.get("id").is_some_and(|v| value_matches(v, id)))
            .collect(),
    }
}

/// Read a JSON artifact-metadata file.
///
/// Missing file yields `None`; unparseable content degrades to an object
/// carrying the raw text rather than an error.
pub fn get_artifact_metadata(path: &Path) -> Option<Value> {
    let bytes = std::fs::read(path).ok()?;
    let text = String::from_utf8_lossy(&bytes);
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(_) => Some(serde_json::json!({ "raw": text })),
    }
}

fn value_matches(value: &Value, id: &str) -> bool {
    match value {
        Value::String(s) => s == id,
        Value::Number(n) => n.to_string() == id,
        _ => false,
    }
}
