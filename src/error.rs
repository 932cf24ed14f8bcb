//! Error taxonomy for the run logging core.
//!
//! Only configuration-time failures are fatal: a log directory or sink that
//! cannot be opened is surfaced immediately and no partial sink set is left
//! active. Everything downstream (malformed records, stale read cursors,
//! unserializable field values) degrades in place and never reaches this
//! type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring logging or storing artifacts.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to create log directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to open log sink {path}: {source}")]
    SinkOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create artifact store root {path}: {source}")]
    ArtifactRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write artifact {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize artifact payload: {0}")]
    ArtifactEncode(String),
}
