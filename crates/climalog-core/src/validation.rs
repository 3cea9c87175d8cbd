use std::collections::HashSet;

use climalog_sheets::{require_column, Sheet};
use polars::prelude::*;

use crate::error::{PipelineError, Result};

/// Checks that the first header cell carries the marker logger exports start
/// with. An empty `expected` marker disables the check.
pub fn ensure_header_marker(sheet: &Sheet, expected: &str) -> Result<()> {
    if expected.is_empty() {
        return Ok(());
    }

    let found = sheet.header_marker().unwrap_or_default();
    if found.trim() != expected {
        return Err(PipelineError::HeaderMarkerMismatch {
            path: sheet.source().to_path_buf(),
            expected: expected.to_string(),
            found: found.to_string(),
        });
    }
    Ok(())
}

/// Fails on the first non-null key that occurs twice in `column`.
pub fn ensure_unique_key(df: &DataFrame, column: &'static str, table: &'static str) -> Result<()> {
    let keys = require_column(df, column)?.str()?;
    let mut seen: HashSet<&str> = HashSet::with_capacity(keys.len());

    for key in keys.into_iter().flatten() {
        if !seen.insert(key) {
            return Err(PipelineError::DuplicateJoinKey {
                table,
                column,
                value: key.to_string(),
            });
        }
    }
    Ok(())
}
