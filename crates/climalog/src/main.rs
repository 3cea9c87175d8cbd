use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use climalog_core::{Pipeline, PipelineConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Building sensor export cleaning pipeline", long_about = None)]
struct Cli {
    /// TOML configuration file (falls back to CLIMALOG_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the archives and extracted exports
    #[arg(long)]
    raw_dir: Option<PathBuf>,
    /// Directory the cleaned workbooks are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Print the run summary as JSON on stdout
    #[arg(long)]
    summary_json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    debug!(?config, "resolved configuration");

    let summary = Pipeline::new(config).run().context("ETL run failed")?;

    info!(
        units = summary.units.units.len(),
        base1_rows = summary.units.total_rows,
        base2_rows = summary.energy_rows,
        base3_rows = summary.temperature.merged_rows,
        "run summary"
    );

    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    dotenvy::dotenv().ok();

    let config_path = cli
        .config
        .clone()
        .or_else(|| env::var("CLIMALOG_CONFIG").ok().map(PathBuf::from));

    let mut config = match config_path {
        Some(path) => PipelineConfig::load(&path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(raw_dir) = &cli.raw_dir {
        config.raw_dir = raw_dir.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }

    Ok(config)
}
