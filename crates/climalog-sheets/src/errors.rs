use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook {path} does not contain any worksheet")]
    NoWorksheet { path: PathBuf },

    #[error("workbook {path} first worksheet is empty (no header row)")]
    EmptySheet { path: PathBuf },

    #[error("column '{column}' not found; available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },

    #[error("column '{column}' row {row}: cannot parse '{value}' as a timestamp")]
    Timestamp {
        column: String,
        row: usize,
        value: String,
    },

    #[error("column '{column}' has unsupported type {dtype} for timestamp parsing")]
    TimestampType { column: String, dtype: String },

    #[error("table with {rows} rows and {columns} columns does not fit in a worksheet")]
    TooLarge { rows: usize, columns: usize },

    #[error("failed to write workbook {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}
