use calamine::Data;
use polars::prelude::*;

use crate::errors::SheetError;
use crate::model::Sheet;
use crate::timestamp::{naive_to_micros, parse_timestamp, CELL_FORMAT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Numeric,
    Boolean,
    Temporal,
    Text,
}

fn cell_kind(cell: &Data) -> Option<CellKind> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::Int(_) | Data::Float(_) => Some(CellKind::Numeric),
        Data::Bool(_) => Some(CellKind::Boolean),
        Data::DateTime(dt) if dt.is_datetime() => Some(CellKind::Temporal),
        Data::DateTimeIso(text) if parse_timestamp(text).is_some() => Some(CellKind::Temporal),
        Data::String(text) if text.trim().is_empty() => None,
        _ => Some(CellKind::Text),
    }
}

/// Picks one type for a column: the shared kind of its non-empty cells, or text
/// when they disagree. `None` means the column holds no values at all.
fn column_kind(cells: &[&Data]) -> Option<CellKind> {
    let mut kind = None;
    for cell in cells {
        match (kind, cell_kind(cell)) {
            (_, None) => {}
            (None, Some(found)) => kind = Some(found),
            (Some(current), Some(found)) if current != found => return Some(CellKind::Text),
            _ => {}
        }
    }
    kind
}

fn cell_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(v) => Some(*v as f64),
        Data::Float(v) => Some(*v),
        _ => None,
    }
}

fn cell_micros(cell: &Data) -> Option<i64> {
    let dt = match cell {
        Data::DateTime(dt) => dt.as_datetime(),
        Data::DateTimeIso(text) => parse_timestamp(text),
        _ => None,
    }?;
    Some(naive_to_micros(dt))
}

/// Text rendering of a cell for columns that mix types.
pub(crate) fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(text) if text.trim().is_empty() => None,
        Data::String(text) => Some(text.clone()),
        Data::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => Some(format!("{}", *v as i64)),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Some(naive.format(CELL_FORMAT).to_string()),
            None => Some(dt.as_f64().to_string()),
        },
        other => Some(other.to_string()),
    }
}

fn build_column(name: &str, cells: &[&Data]) -> Result<Column, SheetError> {
    let series = match column_kind(cells) {
        None => Series::full_null(name.into(), cells.len(), &DataType::Null),
        Some(CellKind::Numeric) => {
            let values: Vec<Option<f64>> = cells.iter().map(|cell| cell_f64(cell)).collect();
            Series::new(name.into(), values)
        }
        Some(CellKind::Boolean) => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Bool(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        Some(CellKind::Temporal) => {
            let values: Vec<Option<i64>> = cells.iter().map(|cell| cell_micros(cell)).collect();
            Series::new(name.into(), values)
                .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
        }
        Some(CellKind::Text) => {
            let values: Vec<Option<String>> = cells.iter().map(|cell| cell_text(cell)).collect();
            Series::new(name.into(), values)
        }
    };
    Ok(series.into())
}

impl Sheet {
    /// Converts the sheet into a DataFrame, one typed column per header.
    pub fn into_frame(self) -> Result<DataFrame, SheetError> {
        let mut columns = Vec::with_capacity(self.headers.len());
        for (idx, name) in self.headers.iter().enumerate() {
            let cells: Vec<&Data> = self.rows.iter().map(|row| &row[idx]).collect();
            columns.push(build_column(name, &cells)?);
        }
        Ok(DataFrame::new(columns)?)
    }
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, SheetError> {
    df.column(name).map_err(|_| SheetError::MissingColumn {
        column: name.to_string(),
        available: column_names(df),
    })
}

pub fn rename_column(df: &mut DataFrame, from: &str, to: &str) -> Result<(), SheetError> {
    require_column(df, from)?;
    df.rename(from, to.into())?;
    Ok(())
}

/// Renames the leading columns positionally. Columns past `names` keep their
/// header and position.
pub fn rename_leading_columns(df: &mut DataFrame, names: &[&str]) -> Result<(), SheetError> {
    if df.width() < names.len() {
        return Err(SheetError::TooFewColumns {
            expected: names.len(),
            found: df.width(),
        });
    }

    let mut renamed = column_names(df);
    for (current, name) in renamed.iter_mut().zip(names) {
        *current = (*name).to_string();
    }
    df.set_column_names(renamed)?;
    Ok(())
}
