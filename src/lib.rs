//! runlog — run-scoped structured logging
//!
//! Context-tagged event logging for long-running application runs, fanned
//! out to two coupled streams plus an optional console:
//!
//! - **Overview stream**: human-readable, low-volume lines.
//! - **Detail stream**: newline-delimited JSON carrying every structured
//!   field, for machine consumption.
//!
//! On top of the dual-sink logger sit instrumentation helpers (scoped
//! duration measurement, duration and return-count function wrapping),
//! incremental offset-based read-back of the overview stream, aggregation of
//! detail events into summary statistics, and content-addressed offload of
//! large logged objects.
//!
//! # Model
//!
//! One logical run per process: [`configure`] establishes the
//! `{application, run_id}` context and opens the append-mode sinks, and
//! every [`Logger`] obtained afterward tags its events with that context.
//! Writers serialize per sink; readers never share a lock with writers and
//! tolerate files observed mid-append.
//!
//! ```no_run
//! use runlog::{configure, get_logger, time_scope, LogConfig};
//!
//! # fn main() -> Result<(), runlog::LogError> {
//! let _run_id = configure(LogConfig::new("ingestd", "./logs"))?;
//! let logger = get_logger("ingest.batch", None, None);
//! logger.info("starting batch");
//! {
//!     let _timer = time_scope(&logger, "parse_manifest");
//!     // measured work
//! }
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod artifacts;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod format;
pub mod instrument;
pub mod logger;
pub mod objects;
pub mod retrieval;
pub mod severity;
pub mod sink;
pub mod tail;

pub use analytics::{
    count_events, duration_stats, load_detail_entries, return_count_stats, DetailRecord,
    DurationStats,
};
pub use artifacts::{ArtifactMeta, ArtifactStore};
pub use config::{configure, LogConfig};
pub use context::{current, RunContext};
pub use error::LogError;
pub use event::StructuredEvent;
pub use instrument::{
    time_scope, wrap_duration, wrap_return_count, ReturnCount, ScopedDuration,
};
pub use logger::{get_logger, EventBuilder, Logger};
pub use objects::{log_object, log_table, ObjectRecord, ObjectRepr, Table};
pub use retrieval::{get_artifact_metadata, get_detail, get_overview, ReaderConfig};
pub use severity::Severity;
pub use tail::{read_overview, TailPage};
