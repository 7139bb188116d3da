use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use datapress::training::{self, ArtifactLayout};
use datapress::{PipelineError, evaluation, registry};

#[derive(Debug, Parser)]
#[command(
    name = "datapress",
    about = "Config-driven dataset builds and simulated training runs",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a versioned dataset from a YAML config
    Build {
        /// Path to the dataset build config
        config: PathBuf,
    },
    /// Run a simulated training job, then register and evaluate the model
    Train {
        /// Path to the training config
        config: PathBuf,
        /// Model version identifier for the new artifact
        #[arg(long)]
        model_version: String,
        /// Root directory for artifacts
        #[arg(long, default_value = "artifacts")]
        artifacts_dir: PathBuf,
    },
    /// Re-evaluate an already-trained model version
    Evaluate {
        /// Model version to evaluate
        #[arg(long)]
        model_version: String,
        /// Root directory for artifacts
        #[arg(long, default_value = "artifacts")]
        artifacts_dir: PathBuf,
    },
    /// List registered models
    Models {
        /// Root directory for artifacts
        #[arg(long, default_value = "artifacts")]
        artifacts_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("datapress=info".parse().expect("static directive parses")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    match cli.command {
        Command::Build { config } => {
            let version_path = datapress::build_dataset(&config)?;
            println!("{}", version_path.display());
        }
        Command::Train {
            config,
            model_version,
            artifacts_dir,
        } => {
            let layout = ArtifactLayout::rooted_at(&artifacts_dir);
            let result = training::run_training_pipeline(&config, &model_version, &layout)?;
            println!(
                "{}: quality={} latency_ms={} cost_per_1k_tokens={}",
                result.model_version,
                result.metrics.quality_score,
                result.metrics.latency_ms,
                result.metrics.cost_per_1k_tokens
            );
        }
        Command::Evaluate {
            model_version,
            artifacts_dir,
        } => {
            let layout = ArtifactLayout::rooted_at(&artifacts_dir);
            let result = evaluation::evaluate_model(
                &model_version,
                &layout.models_dir,
                &layout.evaluations_dir,
            )?;
            println!(
                "{}: quality={} latency_ms={} cost_per_1k_tokens={}",
                result.model_version,
                result.metrics.quality_score,
                result.metrics.latency_ms,
                result.metrics.cost_per_1k_tokens
            );
        }
        Command::Models { artifacts_dir } => {
            let layout = ArtifactLayout::rooted_at(&artifacts_dir);
            for entry in registry::list_models(&layout.registry_path)? {
                println!(
                    "{}\tbase={}\tdataset={}\tsamples={}",
                    entry.model_version,
                    entry.base_model,
                    entry.dataset_version,
                    entry.num_training_samples
                );
            }
        }
    }
    Ok(())
}
