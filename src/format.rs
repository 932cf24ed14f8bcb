//! Event formatting: one structured event, two renderings.
//!
//! The overview line is the compact human form; the detail line is one JSON
//! object per event for machine consumption. Both are pure functions of the
//! event and perform no I/O.

use chrono::{Local, SecondsFormat};
use serde_json::{Map, Value};

use crate::event::StructuredEvent;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the human-readable overview line:
/// `<timestamp> <LEVEL> [<app>:<run_id>] <logger> - <message>`.
///
/// Unset context fields render as `-` so the line shape stays fixed.
pub fn overview_line(event: &StructuredEvent) -> String {
    format!(
        "{} {} [{}:{}] {} - {}",
        event.timestamp.with_timezone(&Local).format(TIMESTAMP_FORMAT),
        event.level,
        event.app.as_deref().unwrap_or("-"),
        event.run_id.as_deref().unwrap_or("-"),
        event.logger,
        event.message,
    )
}

/// Render the canonical detail JSON line.
///
/// Caller-supplied fields are merged at the top level first; the fixed keys
/// are written afterward so they always win on collision.
pub fn detail_line(event: &StructuredEvent) -> String {
    let mut map = Map::new();

    for (key, value) in &event.fields {
        map.insert(key.clone(), value.clone());
    }

    map.insert(
        "timestamp".into(),
        Value::String(event.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)),
    );
    map.insert("level".into(), Value::String(event.level.to_string()));
    map.insert("logger".into(), Value::String(event.logger.clone()));
    map.insert("message".into(), Value::String(event.message.clone()));
    map.insert("app".into(), optional_string(event.app.as_deref()));
    map.insert("run_id".into(), optional_string(event.run_id.as_deref()));
    map.insert("module".into(), Value::String(event.module.clone()));
    map.insert("function".into(), optional_string(event.function.as_deref()));
    map.insert("line".into(), Value::Number(event.line.into()));

    if let Some(kind) = &event.kind {
        map.insert("event".into(), Value::String(kind.clone()));
    }
    if let Some(exception) = &event.exception {
        map.insert("exception".into(), Value::String(exception.clone()));
    }

    // String-keyed Value maps always serialize; the fallback keeps the
    // emitting call alive in any case.
    serde_json::to_string(&Value::Object(map)).unwrap_or_else(|_| String::from("{}"))
}

fn optional_string(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::String(s.to_string()))
}
