//! Logging configuration: the one entry point that opens the sink set.
//!
//! Configuration is explicit-parameter only; environment sourcing belongs to
//! the deployment layer, not the core. Calling [`configure`] again replaces
//! the active sinks; do not reconfigure while other threads are actively
//! logging (emits in flight have undefined sink targeting).

use std::path::PathBuf;

use crate::context;
use crate::error::LogError;
use crate::logger::{self, Router};
use crate::severity::Severity;
use crate::sink::{ConsoleSink, Sink};

pub const DEFAULT_OVERVIEW_FILENAME: &str = "overview.log";
pub const DEFAULT_DETAIL_FILENAME: &str = "detail.jsonl";

/// Full logging configuration for one run.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub application: String,
    pub log_dir: PathBuf,
    /// Caller-supplied run id; generated when absent.
    pub run_id: Option<String>,
    pub overview_filename: String,
    pub detail_filename: String,
    pub overview_level: Severity,
    pub detail_level: Severity,
    /// Console threshold; `None` disables the console sink.
    pub console_level: Option<Severity>,
}

impl LogConfig {
    pub fn new(application: &str, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            application: application.to_string(),
            log_dir: log_dir.into(),
            run_id: None,
            overview_filename: DEFAULT_OVERVIEW_FILENAME.to_string(),
            detail_filename: DEFAULT_DETAIL_FILENAME.to_string(),
            overview_level: Severity::Info,
            detail_level: Severity::Debug,
            console_level: Some(Severity::Info),
        }
    }

    pub fn with_run_id(mut self, run_id: &str) -> Self {
        self.run_id = Some(run_id.to_string());
        self
    }

    pub fn with_filenames(mut self, overview: &str, detail: &str) -> Self {
        self.overview_filename = overview.to_string();
        self.detail_filename = detail.to_string();
        self
    }

    pub fn with_levels(mut self, overview: Severity, detail: Severity) -> Self {
        self.overview_level = overview;
        self.detail_level = detail;
        self
    }

    pub fn with_console(mut self, level: Option<Severity>) -> Self {
        self.console_level = level;
        self
    }

    pub fn overview_path(&self) -> PathBuf {
        self.log_dir.join(&self.overview_filename)
    }

    pub fn detail_path(&self) -> PathBuf {
        self.log_dir.join(&self.detail_filename)
    }
}

/// Configure logging with overview, detail, and console sinks.
///
/// Creates the log directory if absent, opens both files in append mode,
/// installs the sink set (replacing any previous one), establishes the run
/// context, and returns the run id in effect. Fails without installing a
/// partial sink set: the process must not silently log nowhere.
pub fn configure(config: LogConfig) -> Result<String, LogError> {
    std::fs::create_dir_all(&config.log_dir).map_err(|source| LogError::DirectoryCreate {
        path: config.log_dir.clone(),
        source,
    })?;

    // Open every sink before installing any of them.
    let overview = Sink::open(&config.overview_path(), config.overview_level)?;
    let detail = Sink::open(&config.detail_path(), config.detail_level)?;
    let console = config.console_level.map(ConsoleSink::new);

    logger::install(Router::new(overview, detail, console));

    let context = context::set_current(&config.application, config.run_id.as_deref());
    tracing::debug!(
        application = %context.application,
        run_id = %context.run_id,
        log_dir = %config.log_dir.display(),
        "logging configured"
    );
    Ok(context.run_id.clone())
}
