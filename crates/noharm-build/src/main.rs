//! noharm-build: Turns the benchmark CSV exports into the dashboard's
//! JSON dataset artifact.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use noharm_config::NoharmConfig;
use noharm_ingestion::pipeline::{build_artifact, write_artifact, BuildInputs};
use noharm_ingestion::sources::MetricSource;
use noharm_ranker::dataset_summary;

#[derive(Parser)]
#[command(name = "noharm-build")]
#[command(about = "Build the NOHARM dashboard dataset from metrics.csv and metadata.csv")]
#[command(version)]
struct Cli {
    /// Per-metric results export
    #[arg(long, default_value = "data/metrics.csv")]
    metrics: PathBuf,

    /// Metric catalog; skipped with a warning if the file is missing
    #[arg(long, default_value = "data/metadata.csv")]
    metadata: PathBuf,

    /// Output artifact path
    #[arg(long, default_value = "public/data/ai-harm-summary.json")]
    out: PathBuf,

    /// Config file (TOML, YAML or JSON). Defaults to $NOHARM_CONFIG, then
    /// ./noharm.toml, then built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<NoharmConfig> {
    let config = match path {
        Some(path) => NoharmConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => NoharmConfig::load().context("failed to load config")?,
    };
    info!(
        exclusions = config.ingestion.exclusions.len(),
        allow_list = config.ingestion.metric_allow_list.len(),
        "Configuration loaded"
    );
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("noharm=debug,info")),
        )
        .init();

    let cli = Cli::parse();
    info!("noharm-build {}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref())?;

    let source = MetricSource {
        metrics_csv: cli.metrics,
        metadata_csv: Some(cli.metadata),
    };
    let inputs = BuildInputs::from_source(&source)
        .with_context(|| format!("failed to read {}", source.metrics_csv.display()))?;

    let artifact = build_artifact(&inputs, &config.ingestion).context("failed to build dataset")?;
    write_artifact(&cli.out, &artifact)
        .with_context(|| format!("failed to write {}", cli.out.display()))?;

    let summary = dataset_summary(&artifact.rows);
    println!(
        "Wrote {} rows ({} metrics, {} models, {} catalog entries) to {}",
        summary.total_rows,
        summary.total_metrics,
        summary.total_models,
        artifact.metadata.len(),
        cli.out.display()
    );
    Ok(())
}
