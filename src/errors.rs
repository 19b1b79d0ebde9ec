//! Error taxonomy for parsing, building, and exporting forests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForestError {
    #[error("cycle detected in hierarchy at: {0}")]
    CycleDetected(String),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid directive at {path}:{line}: {reason}")]
    InvalidDirective {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("unknown node id `{id}` at {path}:{line}")]
    UnknownNode {
        path: PathBuf,
        line: usize,
        id: String,
    },

    #[error("no relation files found in: {0}")]
    NoInput(PathBuf),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ForestResult<T> = Result<T, ForestError>;
