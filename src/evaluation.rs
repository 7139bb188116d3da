use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::canonical::digest_bytes;
use crate::constants::artifacts::EVALUATION_FILENAME;
use crate::errors::PipelineError;
use crate::training::load_model_metadata;
use crate::types::{ModelVersion, VersionName};

/// Simulated quality metrics for a model/dataset pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// Simulated quality in `[0.5, 1.0)`.
    pub quality_score: f64,
    /// Simulated latency in `[20, 100)` milliseconds.
    pub latency_ms: u64,
    /// Simulated cost per thousand tokens.
    pub cost_per_1k_tokens: f64,
}

/// Persisted result of one evaluation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Model the evaluation ran against.
    pub model_version: ModelVersion,
    /// Dataset version the model was trained on.
    pub dataset_version: VersionName,
    /// Derived metrics.
    pub metrics: EvaluationMetrics,
}

/// Derive metrics from the SHA-256 digest of
/// `"<model_version>:<dataset_version>"`. Same inputs always yield the
/// same metrics.
pub fn simulate_metrics(model_version: &str, dataset_version: &str) -> EvaluationMetrics {
    let digest = digest_bytes(format!("{model_version}:{dataset_version}").as_bytes());
    let quality_score = 0.5 + (hex_window(&digest, 0) % 5_000) as f64 / 10_000.0;
    let latency_ms = 20 + hex_window(&digest, 8) % 80;
    let cost_per_1k_tokens = 0.01 + (hex_window(&digest, 16) % 90) as f64 / 10_000.0;
    EvaluationMetrics {
        quality_score: round4(quality_score),
        latency_ms,
        cost_per_1k_tokens: round4(cost_per_1k_tokens),
    }
}

fn hex_window(digest: &str, start: usize) -> u64 {
    u64::from_str_radix(&digest[start..start + 8], 16).expect("digest is lowercase hex")
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Load a model's metadata, simulate metrics, and persist
/// `evaluation.json` under `<output_dir>/<model_version>/`.
pub fn evaluate_model(
    model_version: &str,
    models_dir: &Path,
    output_dir: &Path,
) -> Result<EvaluationResult, PipelineError> {
    let metadata = load_model_metadata(model_version, models_dir)?;
    let metrics = simulate_metrics(model_version, &metadata.dataset_version);
    let result = EvaluationResult {
        model_version: model_version.to_string(),
        dataset_version: metadata.dataset_version,
        metrics,
    };

    let eval_dir = output_dir.join(model_version);
    fs::create_dir_all(&eval_dir)?;
    fs::write(
        eval_dir.join(EVALUATION_FILENAME),
        serde_json::to_vec_pretty(&result)?,
    )?;
    info!(
        model = model_version,
        quality = result.metrics.quality_score,
        "wrote evaluation artifact"
    );
    Ok(result)
}

/// Load a persisted evaluation artifact.
pub fn load_evaluation(
    model_version: &str,
    output_dir: &Path,
) -> Result<EvaluationResult, PipelineError> {
    let path = evaluation_path(output_dir, model_version);
    if !path.is_file() {
        return Err(PipelineError::NotFound {
            kind: "evaluation result",
            path,
        });
    }
    let raw = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn evaluation_path(output_dir: &Path, model_version: &str) -> PathBuf {
    output_dir.join(model_version).join(EVALUATION_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_are_deterministic_per_pair() {
        let first = simulate_metrics("m1", "faq_v1");
        let second = simulate_metrics("m1", "faq_v1");
        assert_eq!(first, second);

        let other = simulate_metrics("m2", "faq_v1");
        assert_ne!(first, other);
    }

    #[test]
    fn metrics_stay_in_documented_ranges() {
        for idx in 0..50 {
            let metrics = simulate_metrics(&format!("model_{idx}"), "v1");
            assert!((0.5..1.0).contains(&metrics.quality_score));
            assert!((20..100).contains(&metrics.latency_ms));
            assert!((0.01..0.019_1).contains(&metrics.cost_per_1k_tokens));
        }
    }

    #[test]
    fn missing_evaluation_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_evaluation("absent", dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { kind: "evaluation result", .. }));
    }
}
