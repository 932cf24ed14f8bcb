//! Aggregation over the detail stream.
//!
//! Parsing is tolerant by contract: a line that is not valid JSON becomes a
//! degraded record carrying the raw text, is excluded from every numeric
//! aggregation, and never aborts a load. Statistics are recomputed fresh
//! from the matching events on every call; nothing here is persisted.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::instrument::{DURATION_EVENT, RETURN_COUNT_EVENT};

/// One detail-stream record: parsed JSON or the raw text of a line that
/// failed to parse.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DetailRecord {
    Parsed(Map<String, Value>),
    Degraded { raw: String },
}

impl DetailRecord {
    /// Look up a field on a parsed record; degraded records have none.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            DetailRecord::Parsed(map) => map.get(key),
            DetailRecord::Degraded { .. } => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, DetailRecord::Degraded { .. })
    }
}

/// Parse one detail line, degrading instead of failing.
pub fn parse_detail_line(line: &str) -> DetailRecord {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => DetailRecord::Parsed(map),
        _ => DetailRecord::Degraded {
            raw: line.to_string(),
        },
    }
}

/// Load detail-stream records from a JSONL file.
///
/// A missing file yields an empty set; invalid UTF-8 is read lossily; blank
/// lines are skipped. Readers hold no lock shared with writers, so a
/// truncated trailing line (writer mid-append) simply degrades.
pub fn load_detail_entries(path: &Path) -> Vec<DetailRecord> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return Vec::new(),
    };

    String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_detail_line)
        .collect()
}

/// Count records by their `event` tag.
pub fn count_events(records: &[DetailRecord]) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for record in records {
        if let Some(Value::String(event)) = record.get("event") {
            *counts.entry(event.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Summary statistics for one group of numeric observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationStats {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Aggregate `duration` events by `duration_name`.
///
/// When `unit` is given, only events carrying that unit tag are included.
/// The elapsed value is read from `elapsed_ms`, falling back to `elapsed`;
/// non-numeric or missing values are skipped, not counted.
pub fn duration_stats(
    records: &[DetailRecord],
    unit: Option<&str>,
) -> HashMap<String, DurationStats> {
    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();

    for record in records {
        if record.get("event").and_then(Value::as_str) != Some(DURATION_EVENT) {
            continue;
        }
        if let Some(unit) = unit {
            if record.get("unit").and_then(Value::as_str) != Some(unit) {
                continue;
            }
        }
        let name = match record.get("duration_name").and_then(Value::as_str) {
            Some(name) => name,
            None => continue,
        };
        let elapsed = record
            .get("elapsed_ms")
            .or_else(|| record.get("elapsed"))
            .and_then(numeric);
        if let Some(elapsed) = elapsed {
            groups.entry(name.to_string()).or_default().push(elapsed);
        }
    }

    summarize(groups)
}

/// Aggregate `return_count` events by `return_count_name`.
pub fn return_count_stats(records: &[DetailRecord]) -> HashMap<String, DurationStats> {
    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();

    for record in records {
        if record.get("event").and_then(Value::as_str) != Some(RETURN_COUNT_EVENT) {
            continue;
        }
        let name = match record.get("return_count_name").and_then(Value::as_str) {
            Some(name) => name,
            None => continue,
        };
        if let Some(count) = record.get("count").and_then(numeric) {
            groups.entry(name.to_string()).or_default().push(count);
        }
    }

    summarize(groups)
}

/// Accept a JSON number, or a numeric string such as `"12.5"`.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn summarize(groups: HashMap<String, Vec<f64>>) -> HashMap<String, DurationStats> {
    groups
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(name, values)| {
            let count = values.len() as u64;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let avg = values.iter().sum::<f64>() / values.len() as f64;
            (
                name,
                DurationStats {
                    count,
                    min,
                    max,
                    avg,
                },
            )
        })
        .collect()
}
