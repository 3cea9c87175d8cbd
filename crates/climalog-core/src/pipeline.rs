use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::archive::{extract_archive, ExtractOutcome};
use crate::config::PipelineConfig;
use crate::energy::process_energy;
use crate::error::Result;
use crate::temperature::{process_temperature, TemperatureSummary};
use crate::units::{normalize_units, UnitTableSummary};

/// Row counts and extraction results of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub extractions: Vec<ExtractOutcome>,
    pub units: UnitTableSummary,
    pub energy_rows: usize,
    pub temperature: TemperatureSummary,
}

/// Creates the output directory if needed. Returns `true` when it was created.
pub fn ensure_output_directory(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    info!("Created directory: {}", path.display());
    Ok(true)
}

/// The four stages in their fixed order: unit archive and AC status table,
/// energy archive and energy merge, then the temperature merge on top of the
/// energy table. Archive problems are logged and skipped; any other error ends
/// the run, leaving already written outputs in place.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<RunSummary> {
        let config = &self.config;
        ensure_output_directory(&config.output_dir)?;

        let mut extractions = Vec::with_capacity(2);

        extractions.push(extract_archive(config, &config.archives.units));
        let units = normalize_units(config)?;

        extractions.push(extract_archive(config, &config.archives.energy));
        let energy = process_energy(config)?;
        let temperature = process_temperature(config, &energy)?;

        info!("ETL process complete");

        Ok(RunSummary {
            extractions,
            units,
            energy_rows: energy.height(),
            temperature,
        })
    }
}
