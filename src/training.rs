use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::artifacts::{
    DEFAULT_DATASETS_DIR, DEFAULT_EVALUATIONS_DIR, DEFAULT_MODELS_DIR, METADATA_FILENAME,
    REGISTRY_FILENAME,
};
use crate::errors::PipelineError;
use crate::evaluation::{self, EvaluationResult};
use crate::registry;
use crate::types::{ModelVersion, VersionName};
use crate::versioning::record_stream_path;

/// Filesystem roots shared by training, registry, and evaluation artifacts.
///
/// Threaded explicitly through every entry point; there is no process-wide
/// path state.
#[derive(Clone, Debug)]
pub struct ArtifactLayout {
    /// Root directory holding dataset versions.
    pub datasets_dir: PathBuf,
    /// Root directory holding model artifacts.
    pub models_dir: PathBuf,
    /// Root directory holding evaluation artifacts.
    pub evaluations_dir: PathBuf,
    /// Location of the model registry file.
    pub registry_path: PathBuf,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            datasets_dir: DEFAULT_DATASETS_DIR.into(),
            models_dir: DEFAULT_MODELS_DIR.into(),
            evaluations_dir: DEFAULT_EVALUATIONS_DIR.into(),
            registry_path: Path::new(DEFAULT_MODELS_DIR).join(REGISTRY_FILENAME),
        }
    }
}

impl ArtifactLayout {
    /// Standard layout nested under a single artifacts root.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            datasets_dir: root.join("datasets"),
            models_dir: root.join("models"),
            evaluations_dir: root.join("evaluations"),
            registry_path: root.join("models").join(REGISTRY_FILENAME),
        }
    }
}

/// Typed training-run configuration with eager validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Base model the simulated run starts from.
    pub base_model: String,
    /// Dataset version the run trains on.
    pub dataset_version: VersionName,
    /// Learning rate; recorded verbatim in the model artifact.
    pub learning_rate: f64,
    /// Number of passes over the dataset.
    pub epochs: u32,
    /// Samples per simulated step.
    pub batch_size: u32,
}

impl TrainingConfig {
    /// Load and validate a training config from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PipelineError::NotFound {
                kind: "training config file",
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&raw).map_err(|err| {
            PipelineError::InvalidConfig(format!("training config does not parse: {err}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check required strings are non-empty and counters are positive.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.base_model.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "'base_model' must be a non-empty string".to_string(),
            ));
        }
        if self.dataset_version.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "'dataset_version' must be a non-empty string".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(PipelineError::InvalidConfig(
                "'epochs' must be positive".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "'batch_size' must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Metadata document written for every model artifact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Externally supplied model identifier.
    pub model_version: ModelVersion,
    /// Base model the run started from.
    pub base_model: String,
    /// Dataset version the model was trained on.
    pub dataset_version: VersionName,
    /// Verbatim training configuration.
    pub training_config: TrainingConfig,
    /// Line count of the dataset's record stream at training time.
    pub num_training_samples: usize,
}

/// Count records in a dataset version by reading its record stream.
pub fn count_dataset_samples(version_path: &Path) -> Result<usize, PipelineError> {
    let data_path = record_stream_path(version_path);
    if !data_path.is_file() {
        return Err(PipelineError::NotFound {
            kind: "dataset record stream",
            path: data_path,
        });
    }
    let reader = BufReader::new(fs::File::open(&data_path)?);
    let mut count = 0;
    for line in reader.lines() {
        line?;
        count += 1;
    }
    Ok(count)
}

/// Run a simulated training job and persist the model artifact; returns the
/// model directory.
pub fn train_model(
    training_config_path: impl AsRef<Path>,
    model_version: &str,
    datasets_dir: &Path,
    models_dir: &Path,
) -> Result<PathBuf, PipelineError> {
    let config = TrainingConfig::from_yaml_file(training_config_path)?;
    let dataset_path = datasets_dir.join(&config.dataset_version);
    if !dataset_path.is_dir() {
        return Err(PipelineError::NotFound {
            kind: "dataset version",
            path: dataset_path,
        });
    }
    let num_training_samples = count_dataset_samples(&dataset_path)?;

    simulate_training(&config, num_training_samples);

    let output_path = models_dir.join(model_version);
    fs::create_dir_all(&output_path)?;
    let metadata = ModelMetadata {
        model_version: model_version.to_string(),
        base_model: config.base_model.clone(),
        dataset_version: config.dataset_version.clone(),
        training_config: config,
        num_training_samples,
    };
    fs::write(
        output_path.join(METADATA_FILENAME),
        serde_json::to_vec_pretty(&metadata)?,
    )?;
    info!(
        model = model_version,
        samples = num_training_samples,
        "wrote model artifact"
    );
    Ok(output_path)
}

/// Deterministic no-op standing in for a real training loop.
fn simulate_training(config: &TrainingConfig, num_samples: usize) {
    let steps = config.epochs as usize * (num_samples / config.batch_size.max(1) as usize);
    info!(
        base_model = %config.base_model,
        dataset = %config.dataset_version,
        steps,
        "simulated training run"
    );
}

/// Load a model artifact's metadata document.
pub fn load_model_metadata(
    model_version: &str,
    models_dir: &Path,
) -> Result<ModelMetadata, PipelineError> {
    let path = models_dir.join(model_version).join(METADATA_FILENAME);
    if !path.is_file() {
        return Err(PipelineError::NotFound {
            kind: "model metadata",
            path,
        });
    }
    let raw = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Train, register, and evaluate in sequence; returns the evaluation
/// results.
pub fn run_training_pipeline(
    training_config_path: impl AsRef<Path>,
    model_version: &str,
    layout: &ArtifactLayout,
) -> Result<EvaluationResult, PipelineError> {
    train_model(
        training_config_path,
        model_version,
        &layout.datasets_dir,
        &layout.models_dir,
    )?;
    let metadata = load_model_metadata(model_version, &layout.models_dir)?;
    registry::register_model(&metadata, &layout.registry_path)?;
    evaluation::evaluate_model(model_version, &layout.models_dir, &layout.evaluations_dir)
}
