//! The structured event value type shared by both formatters.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::severity::Severity;

/// One structured log event, created at the moment a log call is made and
/// never mutated afterward.
///
/// The fixed field set mirrors the detail-stream schema; everything the
/// caller supplies beyond it lives in `fields` and is merged into the detail
/// JSON at the top level (fixed keys win on collision).
#[derive(Debug, Clone)]
pub struct StructuredEvent {
    pub timestamp: DateTime<Utc>,
    pub level: Severity,
    /// Name of the logger that emitted the event.
    pub logger: String,
    pub message: String,
    pub app: Option<String>,
    pub run_id: Option<String>,
    /// Call-site source file, captured via `#[track_caller]`.
    pub module: String,
    /// Emitting function, when the caller names one (instrumentation does).
    pub function: Option<String>,
    pub line: u32,
    /// Open event tag (`"duration"`, `"return_count"`, `"object"`, or
    /// caller-defined), emitted into detail JSON under the `event` key.
    pub kind: Option<String>,
    /// Caller-supplied structured fields.
    pub fields: Map<String, Value>,
    /// Formatted error trace, when one was attached.
    pub exception: Option<String>,
}

impl StructuredEvent {
    /// Create an event with the fixed fields filled in and no caller fields.
    pub fn new(
        level: Severity,
        logger: &str,
        message: String,
        app: Option<String>,
        run_id: Option<String>,
        module: &str,
        line: u32,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            logger: logger.to_string(),
            message,
            app,
            run_id,
            module: module.to_string(),
            function: None,
            line,
            kind: None,
            fields: Map::new(),
            exception: None,
        }
    }
}
