//! Risk scoring pipeline - command line entry point.
//!
//! Loads the selected domain's model artifact, runs each input file
//! through the pipeline, prints one structured JSON summary per file,
//! and finishes with a process metrics summary.

use anyhow::{Context, Result};
use clap::Parser;
use risk_scoring_pipeline::{
    config::AppConfig,
    domains,
    metrics::PipelineMetrics,
    models::OnnxScorer,
    pipeline::{Pipeline, PipelineOptions},
    storage::{RestTableStore, RetryPolicy},
    types::summary::FailureReport,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "risk-scoring-pipeline",
    about = "Score uploaded tabular files and persist prediction records"
)]
struct Cli {
    /// Configuration file path.
    #[arg(long, default_value = "config/config.toml")]
    config: PathBuf,

    /// Domain to score: vessel, turbofan, or inventory.
    domain: String,

    /// Input files to process.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_path(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    init_tracing(&config)?;

    info!("Starting risk scoring pipeline");

    let descriptor = domains::descriptor(&cli.domain).with_context(|| {
        format!(
            "unknown domain: {} (expected one of: vessel, turbofan, inventory)",
            cli.domain
        )
    })?;
    let domain_config = config.domain(descriptor.key);

    // Model load is the fail-fast step: a missing or drifted artifact
    // stops the process before any file is touched.
    let model = OnnxScorer::load(
        config.model_path(descriptor.key, &domain_config),
        descriptor,
        config.models.onnx_threads,
    )
    .context("model artifact failed to load")?;
    info!(
        domain = descriptor.key,
        features = descriptor.arity(),
        "model ready"
    );

    let store = RestTableStore::new(
        &config.storage.url,
        &config.storage.api_key,
        config.storage.timeout_secs,
    )?;
    info!(url = %config.storage.url, "store client ready");

    let options = PipelineOptions {
        table: domain_config.table.clone(),
        batch_size: domain_config.batch_size.unwrap_or(config.pipeline.batch_size),
        retry: RetryPolicy {
            max_attempts: config.pipeline.retry_attempts,
            base_backoff_ms: config.pipeline.retry_backoff_ms,
        },
        thresholds: domain_config.thresholds.clone(),
    };
    let pipeline = Pipeline::new(descriptor, Arc::new(model), Arc::new(store), options)?;

    let metrics = PipelineMetrics::new();
    let mut failures = 0usize;

    for file in &cli.files {
        let started = Instant::now();
        match pipeline.run_file(file).await {
            Ok(summary) => {
                metrics.record_upload(started.elapsed(), &summary);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            Err(err) => {
                failures += 1;
                error!(file = %file.display(), error = %err, "upload failed");
                let report = FailureReport::from_error(&err);
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
    }

    metrics.print_summary();

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(config: &AppConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("risk_scoring_pipeline={}", config.logging.level).parse()?);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
