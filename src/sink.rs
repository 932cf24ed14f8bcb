//! Append-only event sinks.
//!
//! Each sink owns its file handle behind its own mutex — the one mandatory
//! lock in the system. Every emit is a single locked append of a complete
//! line, so concurrent emitters never interleave mid-record. A sink write
//! failure is observed (via the `tracing` facade) but never propagated: the
//! emitting caller must not fail because a log line could not be written.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::LogError;
use crate::severity::Severity;

/// An append-only file sink with its own minimum severity.
pub struct Sink {
    path: PathBuf,
    file: Mutex<File>,
    min_level: Severity,
}

impl Sink {
    /// Open (or create) the sink file in append mode.
    ///
    /// Append is required: restarting logging mid-run must not destroy
    /// entries written by an earlier configuration.
    pub fn open(path: &Path, min_level: Severity) -> Result<Self, LogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LogError::SinkOpen {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            min_level,
        })
    }

    /// Whether an event of the given severity passes this sink's threshold.
    pub fn accepts(&self, level: Severity) -> bool {
        level >= self.min_level
    }

    /// Append one complete line under the sink's mutex.
    pub fn append(&self, line: &str) {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        let mut file = self.file.lock();
        if let Err(e) = file.write_all(&buf) {
            tracing::warn!(path = %self.path.display(), error = %e, "log sink append failed");
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Console sink: the overview rendering on stderr, gated by its own level.
pub struct ConsoleSink {
    min_level: Severity,
}

impl ConsoleSink {
    pub fn new(min_level: Severity) -> Self {
        Self { min_level }
    }

    pub fn accepts(&self, level: Severity) -> bool {
        level >= self.min_level
    }

    pub fn append(&self, line: &str) {
        // Stderr serializes per write on its own lock.
        let _ = writeln!(std::io::stderr(), "{}", line);
    }
}
