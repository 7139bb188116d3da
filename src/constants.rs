/// Constants for the persisted artifact layout.
pub mod artifacts {
    /// Record stream filename inside a dataset version directory.
    pub const DATA_FILENAME: &str = "data.jsonl";
    /// Metadata filename inside dataset version and model directories.
    pub const METADATA_FILENAME: &str = "metadata.json";
    /// Evaluation result filename inside an evaluation directory.
    pub const EVALUATION_FILENAME: &str = "evaluation.json";
    /// Model registry filename.
    pub const REGISTRY_FILENAME: &str = "registry.json";

    /// Default root directory for dataset versions.
    pub const DEFAULT_DATASETS_DIR: &str = "artifacts/datasets";
    /// Default root directory for model artifacts.
    pub const DEFAULT_MODELS_DIR: &str = "artifacts/models";
    /// Default root directory for evaluation artifacts.
    pub const DEFAULT_EVALUATIONS_DIR: &str = "artifacts/evaluations";

    /// Prefix for private staging directories used by atomic version writes.
    pub const STAGING_PREFIX: &str = ".staging-";
}

/// Constants for cleaning and filtering passes.
pub mod filtering {
    /// Consecutive-repeat threshold used when the noise filter is enabled
    /// without an explicit `noise_max_repeat`.
    pub const DEFAULT_NOISE_MAX_REPEAT: usize = 10;
}
