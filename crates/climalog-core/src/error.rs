// crates/climalog-core/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Spreadsheet operation failed: {0}")]
    Sheet(#[from] climalog_sheets::SheetError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("ZIP operation failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Configuration file {path} is invalid: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unit file '{file}' does not carry a valid unit identifier: {reason}")]
    InvalidUnitIdentifier { file: String, reason: String },

    #[error("{path}: expected header marker '{expected}' in the first cell, found '{found}'")]
    HeaderMarkerMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("join key '{column}' is not unique in the {table} table: '{value}' appears more than once")]
    DuplicateJoinKey {
        table: &'static str,
        column: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
