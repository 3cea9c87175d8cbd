use std::path::{Path, PathBuf};

use climalog_sheets::{
    format_timestamp_column, read_sheet, rename_leading_columns, write_frame, MINUTE_FORMAT,
};
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::{PipelineConfig, TemperatureSettings};
use crate::error::Result;
use crate::joins::join_in_left_order;
use crate::schema::{CELSIUS, DATE_TIME};
use crate::validation::{ensure_header_marker, ensure_unique_key};

#[derive(Debug, Clone, Serialize)]
pub struct TemperatureSummary {
    pub temperature_rows: usize,
    pub merged_rows: usize,
    pub merged_output: PathBuf,
    pub standalone_output: PathBuf,
}

pub fn load_temperature_table(path: &Path, settings: &TemperatureSettings) -> Result<DataFrame> {
    let sheet = read_sheet(path)?;
    ensure_header_marker(&sheet, &settings.header_marker)?;

    let mut df = sheet.skip_rows(settings.header_rows).into_frame()?;
    rename_leading_columns(&mut df, &[DATE_TIME, CELSIUS])?;
    format_timestamp_column(&mut df, DATE_TIME, MINUTE_FORMAT)?;
    Ok(df)
}

/// Inner-joins temperature readings onto the energy table. Only timestamps
/// present on both sides survive, in energy-table order.
pub fn merge_temperature(
    energy: &DataFrame,
    temperature: &DataFrame,
    require_unique_keys: bool,
) -> Result<DataFrame> {
    if require_unique_keys {
        ensure_unique_key(temperature, DATE_TIME, "temperature")?;
    }
    join_in_left_order(energy, temperature, DATE_TIME, JoinType::Inner)
}

pub fn process_temperature(
    config: &PipelineConfig,
    energy: &DataFrame,
) -> Result<TemperatureSummary> {
    info!("Processing temperature data (Base3)");
    let settings = &config.temperature;

    let temperature = load_temperature_table(&config.raw_path(&settings.file), settings)?;
    let merged = merge_temperature(energy, &temperature, config.require_unique_join_keys)?;

    let merged_output = config.output_path(&settings.merged_output);
    write_frame(&merged, &merged_output)?;
    let standalone_output = config.output_path(&settings.standalone_output);
    write_frame(&temperature, &standalone_output)?;
    info!(
        "Base3 and temperature saved to {} and {}",
        merged_output.display(),
        standalone_output.display()
    );

    Ok(TemperatureSummary {
        temperature_rows: temperature.height(),
        merged_rows: merged.height(),
        merged_output,
        standalone_output,
    })
}
