use std::path::Path;

use calamine::{open_workbook_auto, Reader};

use crate::errors::SheetError;
use crate::model::{header_names, Sheet};

/// Reads the first worksheet of an `.xls` or `.xlsx` workbook.
///
/// The first row becomes the header row, every following row a data row.
pub fn read_sheet(path: impl AsRef<Path>) -> Result<Sheet, SheetError> {
    let path = path.as_ref();

    let mut workbook = open_workbook_auto(path).map_err(|source| SheetError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|source| SheetError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| SheetError::EmptySheet {
        path: path.to_path_buf(),
    })?;
    let headers = header_names(header);
    let data = rows.map(|row| row.to_vec()).collect();

    Ok(Sheet::new(path, headers, data))
}
