//! Object logging: inline small values, offload large ones.
//!
//! The decision is by serialized size against an inline limit (default 2048
//! bytes). Tabular values are preferentially offloaded in a columnar binary
//! encoding (MessagePack, column-major); any conversion failure falls
//! through to the JSON path without raising. Object logging never fails the
//! caller: storage errors degrade to an inline event describing the problem.

use serde::Serialize;
use serde_json::{json, Value};

use crate::artifacts::{ArtifactMeta, ArtifactStore};
use crate::logger::Logger;
use crate::severity::Severity;

pub const OBJECT_EVENT: &str = "object";

/// Serialized-size threshold below which values are embedded in the event.
pub const DEFAULT_INLINE_LIMIT: usize = 2048;

/// How a logged object was represented in the detail stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectRepr {
    /// Embedded directly in the event's fields.
    Inline,
    /// Offloaded as JSON bytes to the artifact store.
    Artifact,
    /// Offloaded column-major as MessagePack.
    Table,
}

/// What `log_object`/`log_table` recorded, returned for the caller's use.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectRecord {
    pub key: String,
    pub repr: ObjectRepr,
    pub byte_size: u64,
    /// Present only when the value was offloaded.
    pub artifact: Option<ArtifactMeta>,
}

/// Log a value, inlining it or offloading it by serialized size.
pub fn log_object<T: Serialize + std::fmt::Debug>(
    logger: &Logger,
    key: &str,
    value: &T,
    store: &ArtifactStore,
    inline_limit: Option<usize>,
) -> ObjectRecord {
    // A value that cannot serialize natively falls back to its debug string
    // rather than aborting the emit.
    let value = serde_json::to_value(value).unwrap_or_else(|_| json!(format!("{:?}", value)));
    log_value(logger, key, value, store, inline_limit)
}

fn log_value(
    logger: &Logger,
    key: &str,
    value: Value,
    store: &ArtifactStore,
    inline_limit: Option<usize>,
) -> ObjectRecord {
    let limit = inline_limit.unwrap_or(DEFAULT_INLINE_LIMIT);
    let bytes = serde_json::to_vec(&value).unwrap_or_else(|_| Vec::new());

    if bytes.len() <= limit {
        let record = ObjectRecord {
            key: key.to_string(),
            repr: ObjectRepr::Inline,
            byte_size: bytes.len() as u64,
            artifact: None,
        };
        logger
            .event(Severity::Info, OBJECT_EVENT)
            .kind(OBJECT_EVENT)
            .field("key", key)
            .field("repr", "inline")
            .field("byte_size", bytes.len() as u64)
            .field("value", &value)
            .emit();
        return record;
    }

    match store.put_bytes(&bytes, ".json") {
        Ok(meta) => {
            logger
                .event(Severity::Info, OBJECT_EVENT)
                .kind(OBJECT_EVENT)
                .field("key", key)
                .field("repr", "artifact")
                .field("artifact_path", &meta.path)
                .field("content_hash", &meta.content_hash)
                .field("byte_size", meta.byte_size)
                .emit();
            ObjectRecord {
                key: key.to_string(),
                repr: ObjectRepr::Artifact,
                byte_size: meta.byte_size,
                artifact: Some(meta),
            }
        }
        Err(e) => {
            // Storage failure degrades to an inline event describing it.
            tracing::warn!(key, error = %e, "artifact offload failed, logging inline marker");
            logger
                .event(Severity::Warning, OBJECT_EVENT)
                .kind(OBJECT_EVENT)
                .field("key", key)
                .field("repr", "inline")
                .field("byte_size", bytes.len() as u64)
                .field("offload_error", e.to_string())
                .emit();
            ObjectRecord {
                key: key.to_string(),
                repr: ObjectRepr::Inline,
                byte_size: bytes.len() as u64,
                artifact: None,
            }
        }
    }
}

/// A small row-major table, the dataframe-like shape object logging
/// understands.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Column-major conversion. Fails when a row's width does not match the
    /// column set; the caller falls back to the JSON path in that case.
    fn to_columnar(&self) -> Option<Vec<(String, Vec<Value>)>> {
        let mut columns: Vec<(String, Vec<Value>)> = self
            .columns
            .iter()
            .map(|name| (name.clone(), Vec::with_capacity(self.rows.len())))
            .collect();

        for row in &self.rows {
            if row.len() != columns.len() {
                return None;
            }
            for (slot, value) in columns.iter_mut().zip(row) {
                slot.1.push(value.clone());
            }
        }
        Some(columns)
    }
}

/// Log a table, preferring columnar binary offload.
///
/// The columnar form is MessagePack-encoded and stored content-addressed;
/// on any conversion or encoding failure the table is logged through the
/// plain JSON object path instead. Conversion failure never raises.
pub fn log_table(logger: &Logger, key: &str, table: &Table, store: &ArtifactStore) -> ObjectRecord {
    let encoded = table
        .to_columnar()
        .and_then(|columns| rmp_serde::to_vec_named(&columns).ok());

    let bytes = match encoded {
        Some(bytes) => bytes,
        None => {
            tracing::debug!(key, "columnar conversion failed, falling back to json offload");
            return log_object(logger, key, table, store, Some(0));
        }
    };

    match store.put_bytes(&bytes, ".msgpack") {
        Ok(meta) => {
            logger
                .event(Severity::Info, OBJECT_EVENT)
                .kind(OBJECT_EVENT)
                .field("key", key)
                .field("repr", "table")
                .field("rows", table.rows.len() as u64)
                .field("columns", table.columns.len() as u64)
                .field("artifact_path", &meta.path)
                .field("content_hash", &meta.content_hash)
                .field("byte_size", meta.byte_size)
                .emit();
            ObjectRecord {
                key: key.to_string(),
                repr: ObjectRepr::Table,
                byte_size: meta.byte_size,
                artifact: Some(meta),
            }
        }
        Err(e) => {
            tracing::debug!(key, error = %e, "columnar offload failed, falling back to json");
            log_object(logger, key, table, store, Some(0))
        }
    }
}
