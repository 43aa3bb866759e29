//! Error types for the distribution engine

use std::path::PathBuf;

use thiserror::Error;

/// Distribution / configuration error
#[derive(Error, Debug)]
pub enum DistError {
    #[error("Mode '{0}' has a total weight of 0, nothing can be sampled")]
    EmptyDistribution(String),

    #[error("Invalid mode '{mode}': {reason}")]
    InvalidMode { mode: String, reason: String },

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Event error: {0}")]
    Event(#[from] mf_event::EventError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export pipeline error. Any of these aborts the export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Compression failed for {path:?}: {source}")]
    Compression {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Mode '{mode}' has invalid cost {cost}")]
    InvalidCost { mode: String, cost: f64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Event error: {0}")]
    Event(#[from] mf_event::EventError),

    #[error("Nothing to export, run simulations first")]
    NothingToExport,
}

/// Result type alias
pub type DistResult<T> = Result<T, DistError>;

/// Export result type alias
pub type ExportResult<T> = Result<T, ExportError>;
