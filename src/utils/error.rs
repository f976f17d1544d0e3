//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::utils::config::RECORD_SIZE;
use std::path::PathBuf;
use thiserror::Error;

/// Per-file problems found while loading a trace.
///
/// None of these abort a run on their own; the loader logs them and
/// carries on with the remaining files.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{}: length {len} is not a multiple of the {}-byte record size", path.display(), RECORD_SIZE)]
    TruncatedBuffer { path: PathBuf, len: usize },

    #[error("{}: trace file is empty", path.display())]
    EmptyBuffer { path: PathBuf },

    #[error("{}: cannot read trace file: {source}", path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Conditions that leave nothing to report
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PipelineError {
    #[error("no readable trace files")]
    NoInputFiles,

    #[error("could not find task system release time")]
    MissingSystemRelease,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
