use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::artifacts::DEFAULT_DATASETS_DIR;
use crate::constants::filtering::DEFAULT_NOISE_MAX_REPEAT;
use crate::errors::PipelineError;

/// Declarative description of one dataset build, loaded from a YAML
/// document and immutable afterwards.
///
/// The whole structure, unknown keys included, is embedded verbatim into
/// the resulting version's metadata so the artifact is self-describing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Label recorded on every record produced by this build.
    pub source: String,
    /// Raw input file the build ingests.
    pub input_path: PathBuf,
    /// Unique name of the dataset version this build creates.
    pub version_name: String,
    /// Artifact root; `artifacts/datasets` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Drop exact duplicate `(input, output)` pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_duplicates: Option<bool>,
    /// Minimum character count required of both input and output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Drop records with excessive consecutive character repeats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_noise: Option<bool>,
    /// Run-length threshold for the noise filter; 10 when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_max_repeat: Option<usize>,
    /// Unrecognized keys, echoed into metadata unchanged and unvalidated.
    #[serde(flatten, default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl BuildConfig {
    /// Load and eagerly validate a build config from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PipelineError::NotFound {
                kind: "config file",
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&raw).map_err(|err| {
            PipelineError::InvalidConfig(format!("config does not parse: {err}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check required strings are non-empty and numeric fields are in range.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.source.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "'source' must be a non-empty string".to_string(),
            ));
        }
        if self.input_path.as_os_str().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "'input_path' must be a non-empty path".to_string(),
            ));
        }
        if self.version_name.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "'version_name' must be a non-empty string".to_string(),
            ));
        }
        if self.noise_max_repeat == Some(0) {
            return Err(PipelineError::InvalidConfig(
                "'noise_max_repeat' must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Artifact root the version directory is created under.
    pub fn output_dir(&self) -> &Path {
        self.output_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_DATASETS_DIR))
    }

    /// Whether exact-pair dedup runs during cleaning.
    pub fn remove_duplicates(&self) -> bool {
        self.remove_duplicates.unwrap_or(false)
    }

    /// Character floor applied by the length filter; zero disables it.
    pub fn min_length(&self) -> usize {
        self.min_length.unwrap_or(0)
    }

    /// Whether the noise filter runs.
    pub fn filter_noise(&self) -> bool {
        self.filter_noise.unwrap_or(false)
    }

    /// Effective run-length threshold for the noise filter.
    pub fn noise_max_repeat(&self) -> usize {
        self.noise_max_repeat.unwrap_or(DEFAULT_NOISE_MAX_REPEAT)
    }
}
