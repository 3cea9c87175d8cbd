#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use climalog_core::PipelineConfig;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

pub fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

pub fn write_workbook(path: &Path, rows: &[Vec<Cell>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(value) => {
                    worksheet
                        .write_string(r as u32, c as u16, value.as_str())
                        .expect("write string");
                }
                Cell::Number(value) => {
                    worksheet
                        .write_number(r as u32, c as u16, *value)
                        .expect("write number");
                }
                Cell::Blank => {}
            }
        }
    }
    workbook.save(path).expect("save workbook");
}

/// A logger export: `Log Data` marker, four metadata rows, then readings.
pub fn write_logger_export(path: &Path, readings: &[(&str, f64)]) {
    let mut rows = vec![
        vec![text("Log Data"), Cell::Blank],
        vec![text("Device"), text("building sensor")],
        vec![text("Serial"), text("00-42")],
        vec![text("Interval"), text("15 min")],
        vec![text("Date"), text("Value")],
    ];
    for (timestamp, value) in readings {
        rows.push(vec![text(timestamp), Cell::Number(*value)]);
    }
    write_workbook(path, &rows);
}

/// A logger export whose readings carry a third `Setpoint` column.
pub fn write_setpoint_export(path: &Path, readings: &[(&str, f64, f64)]) {
    let mut rows = vec![
        vec![text("Log Data"), Cell::Blank, Cell::Blank],
        vec![text("Device"), text("building sensor"), Cell::Blank],
        vec![text("Serial"), text("00-42"), Cell::Blank],
        vec![text("Interval"), text("15 min"), Cell::Blank],
        vec![text("Date"), text("Value"), text("Setpoint")],
    ];
    for (timestamp, value, setpoint) in readings {
        rows.push(vec![
            text(timestamp),
            Cell::Number(*value),
            Cell::Number(*setpoint),
        ]);
    }
    write_workbook(path, &rows);
}

/// A meter export with a plain header row.
pub fn write_energy_export(
    path: &Path,
    timestamp_header: &str,
    measure_header: &str,
    readings: &[(&str, f64)],
) {
    let mut rows = vec![vec![text(timestamp_header), text(measure_header)]];
    for (timestamp, value) in readings {
        rows.push(vec![text(timestamp), Cell::Number(*value)]);
    }
    write_workbook(path, &rows);
}

/// `count` quarter-hourly readings on 2024-01-05 starting at 08:00.
pub fn quarter_hours(count: usize) -> Vec<String> {
    (0..count)
        .map(|idx| {
            let minutes = 8 * 60 + idx * 15;
            format!("2024-01-05 {:02}:{:02}:00", minutes / 60, minutes % 60)
        })
        .collect()
}

pub fn zip_files(zip_path: &Path, files: &[PathBuf]) {
    let file = File::create(zip_path).expect("create zip");
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for path in files {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .expect("utf-8 file name");
        zip.start_file(name, options).expect("start zip entry");
        zip.write_all(&fs::read(path).expect("read member"))
            .expect("write zip entry");
    }
    zip.finish().expect("finish zip");
}

/// Raw and output directories inside one temporary root. Energy exports are
/// written as `.xlsx`, so the configuration points at those names.
pub struct Workspace {
    pub root: TempDir,
    pub config: PipelineConfig,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let raw = root.path().join("data_raw");
        fs::create_dir_all(&raw).expect("create raw dir");
        let mut config = PipelineConfig::with_dirs(raw, root.path().join("data_output"));
        config.energy.ac_file = "Energia AC.xlsx".to_string();
        config.energy.general_file = "Energía General.xlsx".to_string();
        Self { root, config }
    }

    pub fn raw(&self, name: &str) -> PathBuf {
        self.config.raw_path(name)
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.config.output_path(name)
    }

    pub fn staging(&self, name: &str) -> PathBuf {
        let dir = self.root.path().join("staging");
        fs::create_dir_all(&dir).expect("create staging dir");
        dir.join(name)
    }
}
