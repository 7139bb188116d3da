use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::PipelineError;
use crate::training::ModelMetadata;

/// Flat JSON-file registry of model metadata documents.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelRegistry {
    /// Registered models, in registration order.
    pub models: Vec<ModelMetadata>,
}

/// Load the registry; a missing file is an empty registry.
pub fn load_registry(registry_path: &Path) -> Result<ModelRegistry, PipelineError> {
    if !registry_path.is_file() {
        return Ok(ModelRegistry::default());
    }
    let raw = fs::read_to_string(registry_path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Append a model entry to the registry and save it atomically, creating
/// the file and parent directories as needed.
pub fn register_model(
    metadata: &ModelMetadata,
    registry_path: &Path,
) -> Result<(), PipelineError> {
    let mut registry = load_registry(registry_path)?;
    registry.models.push(metadata.clone());
    save_registry(&registry, registry_path)?;
    debug!(model = %metadata.model_version, "registered model");
    Ok(())
}

/// All registered models, in registration order.
pub fn list_models(registry_path: &Path) -> Result<Vec<ModelMetadata>, PipelineError> {
    Ok(load_registry(registry_path)?.models)
}

/// Metadata for one registered model version.
pub fn get_model(
    model_version: &str,
    registry_path: &Path,
) -> Result<ModelMetadata, PipelineError> {
    load_registry(registry_path)?
        .models
        .into_iter()
        .find(|entry| entry.model_version == model_version)
        .ok_or_else(|| PipelineError::ModelNotFound(model_version.to_string()))
}

fn save_registry(registry: &ModelRegistry, registry_path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = registry_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_vec_pretty(registry)?;
    let tmp_path = registry_path.with_extension("tmp");
    fs::write(&tmp_path, raw)?;
    fs::rename(&tmp_path, registry_path)?;
    Ok(())
}
