use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{HexDigest, ModelVersion, VersionName};

/// Error type for ingestion, configuration, and artifact persistence failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unsupported input format '{suffix}' for {path}: use .json, .csv, or .txt")]
    UnsupportedFormat { suffix: String, path: String },
    #[error("malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },
    #[error("{kind} not found: {path}")]
    NotFound { kind: &'static str, path: PathBuf },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(
        "dataset version '{version}' already exists with hash {existing}; rebuilt content hashes to {computed}"
    )]
    VersionConflict {
        version: VersionName,
        existing: HexDigest,
        computed: HexDigest,
    },
    #[error("model '{0}' is not registered")]
    ModelNotFound(ModelVersion),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("artifact encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
