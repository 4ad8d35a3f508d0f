use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while validating a run configuration, before any generation
/// work starts.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("maximum node count must be between {min} and {max}, but {requested} was requested")]
    NodeLimitOutOfRange {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error("flowchart count must be at least 1")]
    EmptyBatch,

    #[error("minimum recognition confidence must be within [0, 1], got {0}")]
    InvalidConfidence(f64),
}

/// Errors that can occur while persisting or loading generated artifacts.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Encode(String),

    #[error("deserialization of '{path}' failed: {message}")]
    Decode { path: PathBuf, message: String },
}

/// Errors from the external diagram renderer.
///
/// All of these are recoverable at batch level: the affected flowchart is
/// skipped and the batch continues.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to launch renderer '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer timed out after {seconds}s for '{script}'")]
    Timeout { script: PathBuf, seconds: u64 },

    #[error("renderer produced no output file at '{0}'")]
    MissingOutput(PathBuf),
}

/// Errors from the external text-recognition collaborator.
#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("text recognition failed for '{image}': {message}")]
    Failed { image: PathBuf, message: String },
}

/// Errors that can occur during sample assembly and dataset output.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// One or more of the expected per-chart artifacts (diagram script,
    /// serialized chart, image) is missing. Fatal for that chart only.
    #[error("flowchart {chart_id} has missing or incomplete artifacts")]
    MissingArtifacts { chart_id: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    #[error("dataset I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
