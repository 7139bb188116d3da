use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::canonical::{digest_bytes, serialize_records};
use crate::config::BuildConfig;
use crate::constants::artifacts::{DATA_FILENAME, METADATA_FILENAME, STAGING_PREFIX};
use crate::data::Record;
use crate::errors::PipelineError;
use crate::types::{HexDigest, VersionName};

/// Self-describing metadata persisted beside every record stream, derived
/// entirely from the record sequence and the build configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VersionMetadata {
    /// Version name the artifact was created under.
    pub dataset_version: VersionName,
    /// Number of records in the stream.
    pub num_samples: usize,
    /// Verbatim build configuration that produced the artifact.
    pub config: BuildConfig,
    /// SHA-256 hex digest of the canonical record stream.
    pub dataset_hash: HexDigest,
}

/// Persist `records` as the immutable dataset version `version_name` under
/// `output_dir` and return the version path.
///
/// The version is staged in a private temporary directory and renamed into
/// place, so a failed or interrupted write leaves no visible trace and
/// concurrent builds of different versions cannot corrupt each other.
/// Rebuilding an existing version with identical content returns its path;
/// different content fails with [`PipelineError::VersionConflict`].
pub fn write_version(
    records: &[Record],
    version_name: &str,
    config: &BuildConfig,
    output_dir: &Path,
) -> Result<PathBuf, PipelineError> {
    if version_name.trim().is_empty() {
        return Err(PipelineError::InvalidConfig(
            "'version_name' must be a non-empty string".to_string(),
        ));
    }
    fs::create_dir_all(output_dir)?;
    let version_path = output_dir.join(version_name);

    let stream = serialize_records(records)?;
    let digest = digest_bytes(&stream);

    if version_path.exists() {
        return verify_existing(&version_path, version_name, &digest);
    }

    let metadata = VersionMetadata {
        dataset_version: version_name.to_string(),
        num_samples: records.len(),
        config: config.clone(),
        dataset_hash: digest.clone(),
    };

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(output_dir)?;
    fs::write(staging.path().join(DATA_FILENAME), &stream)?;
    fs::write(
        staging.path().join(METADATA_FILENAME),
        serde_json::to_vec_pretty(&metadata)?,
    )?;
    debug!(version = version_name, "staged version artifacts");

    let staged = staging.keep();
    if let Err(err) = fs::rename(&staged, &version_path) {
        let _ = fs::remove_dir_all(&staged);
        // Lost a race with another build of the same name.
        if version_path.exists() {
            return verify_existing(&version_path, version_name, &digest);
        }
        return Err(err.into());
    }

    info!(
        version = version_name,
        samples = records.len(),
        hash = %metadata.dataset_hash,
        "created dataset version"
    );
    Ok(version_path)
}

/// Idempotent-or-conflict check against an already-persisted version.
fn verify_existing(
    version_path: &Path,
    version_name: &str,
    digest: &str,
) -> Result<PathBuf, PipelineError> {
    let existing = load_version_metadata(version_path)?;
    if existing.dataset_hash == digest {
        info!(version = version_name, "version already exists with identical content");
        return Ok(version_path.to_path_buf());
    }
    Err(PipelineError::VersionConflict {
        version: version_name.to_string(),
        existing: existing.dataset_hash,
        computed: digest.to_string(),
    })
}

/// Load the metadata document of a persisted dataset version.
pub fn load_version_metadata(version_path: &Path) -> Result<VersionMetadata, PipelineError> {
    let path = version_path.join(METADATA_FILENAME);
    if !path.is_file() {
        return Err(PipelineError::NotFound {
            kind: "version metadata",
            path,
        });
    }
    let raw = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Path of a version's record stream file.
pub fn record_stream_path(version_path: &Path) -> PathBuf {
    version_path.join(DATA_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::dataset_digest;
    use tempfile::tempdir;

    fn config_for(version_name: &str) -> BuildConfig {
        BuildConfig {
            source: "test".to_string(),
            input_path: PathBuf::from("test.csv"),
            version_name: version_name.to_string(),
            output_dir: None,
            remove_duplicates: None,
            min_length: Some(1),
            filter_noise: None,
            noise_max_repeat: None,
            extra: indexmap::IndexMap::new(),
        }
    }

    fn records() -> Vec<Record> {
        vec![
            Record::new("test", 0, "in1", "out1"),
            Record::new("test", 1, "in2", "out2"),
        ]
    }

    #[test]
    fn write_version_persists_stream_and_metadata() {
        let dir = tempdir().unwrap();
        let config = config_for("test_v1");
        let path = write_version(&records(), "test_v1", &config, dir.path()).unwrap();

        assert_eq!(path, dir.path().join("test_v1"));
        let stream = fs::read_to_string(record_stream_path(&path)).unwrap();
        assert_eq!(stream.lines().count(), 2);
        for line in stream.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            for key in ["id", "input", "output", "source"] {
                assert!(value.get(key).is_some());
            }
        }

        let metadata = load_version_metadata(&path).unwrap();
        assert_eq!(metadata.dataset_version, "test_v1");
        assert_eq!(metadata.num_samples, 2);
        assert_eq!(metadata.config, config);
        assert_eq!(metadata.dataset_hash.len(), 64);
        assert_eq!(metadata.dataset_hash, dataset_digest(&records()).unwrap());
    }

    #[test]
    fn rebuild_with_identical_content_is_idempotent() {
        let dir = tempdir().unwrap();
        let config = config_for("test_v1");
        let first = write_version(&records(), "test_v1", &config, dir.path()).unwrap();
        let second = write_version(&records(), "test_v1", &config, dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rebuild_with_different_content_is_a_conflict() {
        let dir = tempdir().unwrap();
        let config = config_for("test_v1");
        write_version(&records(), "test_v1", &config, dir.path()).unwrap();

        let changed = vec![Record::new("test", 0, "other", "content")];
        let err = write_version(&changed, "test_v1", &config, dir.path()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::VersionConflict { ref version, .. } if version == "test_v1"
        ));

        // The conflicting attempt must leave the original artifact untouched.
        let metadata = load_version_metadata(&dir.path().join("test_v1")).unwrap();
        assert_eq!(metadata.num_samples, 2);
    }

    #[test]
    fn no_staging_directories_survive_a_successful_write() {
        let dir = tempdir().unwrap();
        let config = config_for("test_v1");
        write_version(&records(), "test_v1", &config, dir.path()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(STAGING_PREFIX)
            })
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn empty_version_name_is_rejected() {
        let dir = tempdir().unwrap();
        let config = config_for("");
        let err = write_version(&records(), "", &config, dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn concurrent_builds_of_distinct_versions_do_not_interfere() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let handles: Vec<_> = (0..4)
            .map(|idx| {
                let root = root.clone();
                std::thread::spawn(move || {
                    let name = format!("v{idx}");
                    let records = vec![Record::new("test", 0, format!("in{idx}"), "out")];
                    write_version(&records, &name, &config_for(&name), &root)
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        for idx in 0..4 {
            let metadata = load_version_metadata(&root.join(format!("v{idx}"))).unwrap();
            assert_eq!(metadata.num_samples, 1);
        }
    }
}
