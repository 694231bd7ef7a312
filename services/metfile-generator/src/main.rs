//! GRAL meteo-file generator.
//!
//! Reads a run configuration, samples the precomputed wind fields of a GRAL
//! project at each evaluation point and writes one meteo time series per
//! point.

mod snapshots;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use metfile_pipeline::{CancelFlag, LogProgress, MetfilePipeline, RunConfig, StabilitySource};

use snapshots::{JsonFlowFields, JsonStability};

#[derive(Parser, Debug)]
#[command(name = "metfile-generator")]
#[command(about = "Generate per-point meteo files from GRAL wind fields")]
struct Args {
    /// Run configuration file
    #[arg(short, long, default_value = "metfile.yaml", env = "METFILE_CONFIG")]
    config: PathBuf,

    /// Override the output directory of the configuration
    #[arg(short, long, env = "METFILE_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.json {
        fmt().with_env_filter(filter).with_target(true).json().init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    info!(config = %args.config.display(), "Starting meteo file generator");

    let mut config = RunConfig::from_yaml_file(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;
    if let Some(output_dir) = args.output_dir {
        config.output_dir = Some(output_dir);
    }

    let flow_fields = JsonFlowFields::new(config.flow_field_dir());
    let stability = config
        .uses_local_stability()
        .then(|| JsonStability::new(config.stability_dir()));

    info!(
        points = config.points.len(),
        flow_fields = %config.flow_field_dir().display(),
        local_stability = stability.is_some(),
        output = %config.output_dir().display(),
        "Loaded configuration"
    );

    let cancel = CancelFlag::new();
    let worker_cancel = cancel.clone();
    let pipeline = MetfilePipeline::new(config);

    let mut worker = tokio::task::spawn_blocking(move || {
        let stability = stability.as_ref().map(|s| s as &dyn StabilitySource);
        pipeline.run(&flow_fields, stability, &worker_cancel, &LogProgress)
    });

    let joined = tokio::select! {
        joined = &mut worker => joined,
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, cancelling run");
            cancel.cancel();
            worker.await
        }
    };

    match joined.context("Meteo file worker failed")? {
        Ok(summary) => {
            if summary.truncated_series {
                warn!("Observed time series was cut at a malformed record");
            }
            info!(
                files = summary.files.len(),
                situations = summary.situations,
                records = summary.records,
                "Meteo file generation complete"
            );
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            warn!("Run cancelled, no meteo files written");
            Ok(())
        }
        Err(e) => Err(e).context("Meteo file generation failed"),
    }
}
