use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::Data;

/// A worksheet as read from disk: one header row followed by data rows.
///
/// Every data row has exactly `headers.len()` cells; short rows are padded with
/// [`Data::Empty`] when the sheet is read.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub source: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

impl Sheet {
    pub fn new(source: impl Into<PathBuf>, headers: Vec<String>, rows: Vec<Vec<Data>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Data::Empty);
                row
            })
            .collect();
        Self {
            source: source.into(),
            headers,
            rows,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Text of the first header cell, the marker logger exports put in A1.
    pub fn header_marker(&self) -> Option<&str> {
        self.headers.first().map(String::as_str)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Drops the first `count` data rows. Dropping more rows than exist leaves an
    /// empty sheet that keeps its headers.
    pub fn skip_rows(mut self, count: usize) -> Self {
        let count = count.min(self.rows.len());
        self.rows.drain(..count);
        self
    }
}

/// Builds unique column names from the raw header cells.
///
/// Blank cells become `Unnamed: <index>`; repeated names get a `.1`, `.2`, ...
/// suffix in order of appearance.
pub fn header_names(cells: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(cells.len());

    for (idx, cell) in cells.iter().enumerate() {
        let text = match cell {
            Data::Empty => String::new(),
            Data::Float(v) if v.fract() == 0.0 => format!("{}", *v as i64),
            other => other.to_string().trim().to_string(),
        };
        let base = if text.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            text
        };

        let name = match seen.get_mut(&base) {
            Some(count) => {
                *count += 1;
                format!("{base}.{count}")
            }
            None => {
                seen.insert(base.clone(), 0);
                base
            }
        };
        names.push(name);
    }

    names
}
