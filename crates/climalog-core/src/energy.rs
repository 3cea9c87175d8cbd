use std::path::Path;

use climalog_sheets::{
    format_timestamp_column, read_sheet, rename_column, write_frame, MINUTE_FORMAT,
};
use polars::prelude::*;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::joins::{join_in_left_order, sort_descending};
use crate::schema::{AC_ENERGY, DATE_TIME, GENERAL_ENERGY};
use crate::validation::ensure_unique_key;

/// Loads one meter export, renaming its timestamp column to `date_time` and its
/// measurement column to `measure_target`. Timestamps are cut to the minute and
/// rows sorted newest first.
pub fn load_energy_table(
    path: &Path,
    timestamp_column: &str,
    measure_column: &str,
    measure_target: &str,
) -> Result<DataFrame> {
    let mut df = read_sheet(path)?.into_frame()?;
    rename_column(&mut df, timestamp_column, DATE_TIME)?;
    rename_column(&mut df, measure_column, measure_target)?;
    format_timestamp_column(&mut df, DATE_TIME, MINUTE_FORMAT)?;

    debug!(path = %path.display(), rows = df.height(), "loaded energy table");
    sort_descending(df, DATE_TIME)
}

/// Left-joins AC energy onto general energy by `date_time`. Every general row
/// is kept, in order; AC columns are null where no AC reading matches.
pub fn merge_energy(
    general: &DataFrame,
    ac: &DataFrame,
    require_unique_keys: bool,
) -> Result<DataFrame> {
    if require_unique_keys {
        ensure_unique_key(ac, DATE_TIME, "AC energy")?;
    }
    join_in_left_order(general, ac, DATE_TIME, JoinType::Left)
}

/// Reads both meter exports, merges them and writes the energy output file.
/// The merged table is returned for the temperature stage.
pub fn process_energy(config: &PipelineConfig) -> Result<DataFrame> {
    info!("Processing energy data (Base2)");
    let settings = &config.energy;

    let ac = load_energy_table(
        &config.raw_path(&settings.ac_file),
        &settings.timestamp_column,
        &settings.ac_measure_column,
        AC_ENERGY,
    )?;
    let general = load_energy_table(
        &config.raw_path(&settings.general_file),
        &settings.timestamp_column,
        &settings.general_measure_column,
        GENERAL_ENERGY,
    )?;

    let merged = merge_energy(&general, &ac, config.require_unique_join_keys)?;

    let output = config.output_path(&settings.output);
    write_frame(&merged, &output)?;
    info!(
        rows = merged.height(),
        "Base2 (energy merged) saved to {}",
        output.display()
    );

    Ok(merged)
}
