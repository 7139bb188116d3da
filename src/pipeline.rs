use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::BuildConfig;
use crate::errors::PipelineError;
use crate::filtering::clean_and_filter;
use crate::ingest::ingest;
use crate::versioning::write_version;

/// Run the full dataset build described by a YAML config file and return
/// the created version's path.
pub fn build_dataset(config_path: impl AsRef<Path>) -> Result<PathBuf, PipelineError> {
    let config = BuildConfig::from_yaml_file(config_path)?;
    build_dataset_from_config(&config)
}

/// Run the full dataset build from an in-memory configuration.
///
/// Stages run in fixed, non-skippable order: ingest, clean, filter,
/// serialize and hash, write version. Any stage failure aborts the build
/// with no partial version directory left behind.
pub fn build_dataset_from_config(config: &BuildConfig) -> Result<PathBuf, PipelineError> {
    config.validate()?;

    info!(
        input = %config.input_path.display(),
        source = %config.source,
        "ingesting raw input"
    );
    let records = ingest(&config.input_path, &config.source)?;
    info!(count = records.len(), "ingested records");

    let records = clean_and_filter(records, config);
    info!(count = records.len(), "records after cleaning and filtering");

    let version_path = write_version(
        &records,
        &config.version_name,
        config,
        config.output_dir(),
    )?;
    info!(path = %version_path.display(), "dataset build complete");
    Ok(version_path)
}
