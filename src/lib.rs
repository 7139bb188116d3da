#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Canonical record serialization and dataset digests.
pub mod canonical;
/// Order-preserving record cleaning passes.
pub mod cleaning;
/// Build configuration types and loading.
pub mod config;
/// Centralized constants for artifact layout and filter defaults.
pub mod constants;
/// Record value type.
pub mod data;
/// Deterministic simulated model evaluation.
pub mod evaluation;
/// Length and noise filtering passes.
pub mod filtering;
/// Raw input format readers.
pub mod format;
/// File ingestion and id assignment.
pub mod ingest;
/// Dataset build orchestration.
pub mod pipeline;
/// Flat JSON model registry.
pub mod registry;
/// Simulated training runs and model artifacts.
pub mod training;
/// Shared type aliases.
pub mod types;
/// Dataset version persistence.
pub mod versioning;

mod errors;

pub use config::BuildConfig;
pub use data::Record;
pub use errors::PipelineError;
pub use evaluation::{EvaluationMetrics, EvaluationResult};
pub use format::RecordFormat;
pub use pipeline::{build_dataset, build_dataset_from_config};
pub use registry::ModelRegistry;
pub use training::{ArtifactLayout, ModelMetadata, TrainingConfig};
pub use types::{HexDigest, ModelVersion, RecordId, SourceId, VersionName};
pub use versioning::VersionMetadata;
