use std::path::Path;

use polars::prelude::*;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::errors::SheetError;
use crate::timestamp::{naive_from_epoch, CELL_FORMAT};

const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Writes `df` to an `.xlsx` workbook with a bold header row and no index
/// column. Null cells are left empty.
pub fn write_frame(df: &DataFrame, path: impl AsRef<Path>) -> Result<(), SheetError> {
    let path = path.as_ref();
    let xlsx = |source: XlsxError| SheetError::Write {
        path: path.to_path_buf(),
        source,
    };

    if df.height() + 1 > MAX_ROWS || df.width() > MAX_COLUMNS {
        return Err(SheetError::TooLarge {
            rows: df.height(),
            columns: df.width(),
        });
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (idx, column) in df.get_columns().iter().enumerate() {
        let col_num = idx as u16;
        worksheet
            .write_string_with_format(0, col_num, column.name().as_str(), &header)
            .map_err(xlsx)?;
        write_values(worksheet, col_num, column).map_err(|err| match err {
            CellWriteError::Xlsx(source) => xlsx(source),
            CellWriteError::Polars(source) => SheetError::Polars(source),
        })?;
    }

    workbook.save(path).map_err(xlsx)?;
    Ok(())
}

enum CellWriteError {
    Xlsx(XlsxError),
    Polars(PolarsError),
}

impl From<XlsxError> for CellWriteError {
    fn from(err: XlsxError) -> Self {
        CellWriteError::Xlsx(err)
    }
}

impl From<PolarsError> for CellWriteError {
    fn from(err: PolarsError) -> Self {
        CellWriteError::Polars(err)
    }
}

fn write_values(
    worksheet: &mut Worksheet,
    col_num: u16,
    column: &Column,
) -> Result<(), CellWriteError> {
    match column.dtype() {
        DataType::Null => {}
        DataType::Float64
        | DataType::Float32
        | DataType::Int64
        | DataType::Int32
        | DataType::UInt64
        | DataType::UInt32 => {
            let values = column.cast(&DataType::Float64)?;
            for (row, value) in values.f64()?.into_iter().enumerate() {
                if let Some(number) = value.filter(|v| v.is_finite()) {
                    worksheet.write_number(row as u32 + 1, col_num, number)?;
                }
            }
        }
        DataType::Boolean => {
            for (row, value) in column.bool()?.into_iter().enumerate() {
                if let Some(flag) = value {
                    worksheet.write_boolean(row as u32 + 1, col_num, flag)?;
                }
            }
        }
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let physical = column.cast(&DataType::Int64)?;
            for (row, value) in physical.i64()?.into_iter().enumerate() {
                if let Some(dt) = value.and_then(|raw| naive_from_epoch(raw, unit)) {
                    worksheet.write_string(
                        row as u32 + 1,
                        col_num,
                        dt.format(CELL_FORMAT).to_string(),
                    )?;
                }
            }
        }
        DataType::String => write_strings(worksheet, col_num, column.str()?)?,
        _ => {
            let text = column.cast(&DataType::String)?;
            write_strings(worksheet, col_num, text.str()?)?;
        }
    }
    Ok(())
}

fn write_strings(
    worksheet: &mut Worksheet,
    col_num: u16,
    values: &StringChunked,
) -> Result<(), XlsxError> {
    for (row, value) in values.into_iter().enumerate() {
        if let Some(text) = value {
            worksheet.write_string(row as u32 + 1, col_num, text)?;
        }
    }
    Ok(())
}
