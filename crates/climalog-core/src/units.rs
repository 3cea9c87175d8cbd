use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use climalog_sheets::{
    format_timestamp_column, read_sheet, rename_leading_columns, write_frame, STATUS_FORMAT,
};
use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{PipelineConfig, UnitSettings};
use crate::error::{PipelineError, Result};
use crate::schema::{STATUS_COLUMNS, STATUS_ON, STATUS_TIMESTAMP, UNIT};
use crate::validation::ensure_header_marker;

/// Identifier of one air-conditioning unit, e.g. `AC12`: the configured prefix
/// followed by a unit number. Orders by unit number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId {
    number: u64,
    name: String,
}

impl UnitId {
    /// Derives the identifier from a unit file name such as `AC12.xlsx`.
    pub fn from_file_name(file_name: &str, prefix: &str, extension: &str) -> Result<Self> {
        let invalid = |reason: String| PipelineError::InvalidUnitIdentifier {
            file: file_name.to_string(),
            reason,
        };

        let stem = file_name
            .strip_suffix(extension)
            .and_then(|rest| rest.strip_suffix('.'))
            .ok_or_else(|| invalid(format!("expected a '.{extension}' extension")))?;
        let digits = stem
            .strip_prefix(prefix)
            .ok_or_else(|| invalid(format!("expected the '{prefix}' prefix")))?;

        if digits.is_empty() {
            return Err(invalid(format!("no unit number after '{prefix}'")));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid(format!("'{digits}' is not a unit number")));
        }

        let number = digits
            .parse::<u64>()
            .map_err(|err| invalid(format!("unit number '{digits}' out of range: {err}")))?;

        Ok(Self {
            number,
            name: stem.to_string(),
        })
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct UnitFile {
    pub id: UnitId,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitRows {
    pub unit: String,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct UnitTable {
    pub frame: DataFrame,
    pub units: Vec<UnitRows>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitTableSummary {
    pub units: Vec<UnitRows>,
    pub total_rows: usize,
    pub output: PathBuf,
}

fn is_unit_file(file_name: &str, settings: &UnitSettings) -> bool {
    file_name.starts_with(&settings.file_prefix)
        && file_name.ends_with(&format!(".{}", settings.extension))
}

/// Lists the unit files of `dir` in ascending unit-number order. Every file
/// that matches the prefix and extension must carry a valid identifier.
pub fn discover_unit_files(dir: &Path, settings: &UnitSettings) -> Result<Vec<UnitFile>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if !is_unit_file(&file_name, settings) {
            continue;
        }

        let id = UnitId::from_file_name(&file_name, &settings.file_prefix, &settings.extension)?;
        files.push(UnitFile {
            id,
            path: entry.path(),
        });
    }

    files.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(files)
}

/// Loads one unit export: header check, metadata rows dropped, leading columns
/// renamed to `Fecha`/`Encendido`, timestamps reformatted, unit tag appended.
/// Any further logger columns are carried through unchanged.
pub fn load_unit_table(file: &UnitFile, settings: &UnitSettings) -> Result<DataFrame> {
    let sheet = read_sheet(&file.path)?;
    ensure_header_marker(&sheet, &settings.header_marker)?;

    let mut df = sheet.skip_rows(settings.header_rows).into_frame()?;
    rename_leading_columns(&mut df, &[STATUS_TIMESTAMP, STATUS_ON])?;
    format_timestamp_column(&mut df, STATUS_TIMESTAMP, STATUS_FORMAT)?;

    let rows = df.height();
    df.with_column(Series::new(UNIT.into(), vec![file.id.as_str(); rows]))?;
    Ok(df)
}

fn empty_status_table() -> Result<DataFrame> {
    let columns: Vec<Column> = STATUS_COLUMNS
        .iter()
        .map(|name| Series::new_empty((*name).into(), &DataType::String).into())
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Stacks unit tables in the given order. Columns whose value types differ
/// between units are widened to a common type; a column only some units carry
/// is null for the others. The unit tag stays the last column.
pub fn stack_unit_tables(frames: Vec<DataFrame>) -> Result<DataFrame> {
    if frames.is_empty() {
        return empty_status_table();
    }

    let lazy: Vec<LazyFrame> = frames.into_iter().map(DataFrame::lazy).collect();
    let stacked = concat_lf_diagonal(
        lazy,
        UnionArgs {
            to_supertypes: true,
            ..Default::default()
        },
    )?
    .select([all().exclude([UNIT]), col(UNIT)])
    .collect()?;
    Ok(stacked)
}

/// Builds the combined AC status table from every unit file in the raw-data
/// directory.
pub fn build_unit_table(config: &PipelineConfig) -> Result<UnitTable> {
    let files = discover_unit_files(&config.raw_dir, &config.units)?;
    info!(units = files.len(), "found AC unit files");

    let mut frames = Vec::with_capacity(files.len());
    let mut units = Vec::with_capacity(files.len());
    for file in &files {
        let df = load_unit_table(file, &config.units)?;
        debug!(unit = %file.id, rows = df.height(), "loaded unit table");
        units.push(UnitRows {
            unit: file.id.to_string(),
            rows: df.height(),
        });
        frames.push(df);
    }

    Ok(UnitTable {
        frame: stack_unit_tables(frames)?,
        units,
    })
}

/// Builds the AC status table and writes it to the unit output file.
pub fn normalize_units(config: &PipelineConfig) -> Result<UnitTableSummary> {
    info!("Processing AC units data (Base1)");

    let table = build_unit_table(config)?;
    let output = config.output_path(&config.units.output);
    write_frame(&table.frame, &output)?;
    info!("Base1 (AC unit status) saved to {}", output.display());

    Ok(UnitTableSummary {
        total_rows: table.frame.height(),
        units: table.units,
        output,
    })
}
