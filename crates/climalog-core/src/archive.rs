use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, warn};
use zip::ZipArchive;

use crate::config::PipelineConfig;
use crate::error::Result;

/// What happened to one archive. Extraction problems never stop a run; the
/// outcome is only reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractOutcome {
    Extracted { archive: String, entries: usize },
    Missing { path: PathBuf },
    Failed { archive: String, reason: String },
}

impl ExtractOutcome {
    pub fn is_extracted(&self) -> bool {
        matches!(self, ExtractOutcome::Extracted { .. })
    }
}

/// Unpacks `archive` from the raw-data directory back into the raw-data
/// directory.
pub fn extract_archive(config: &PipelineConfig, archive: &str) -> ExtractOutcome {
    extract_archive_to(&config.raw_dir, archive, &config.raw_dir)
}

/// Unpacks `<raw_dir>/<archive>` into `destination`, logging instead of
/// failing when the archive is absent or unreadable.
pub fn extract_archive_to(raw_dir: &Path, archive: &str, destination: &Path) -> ExtractOutcome {
    let zip_path = raw_dir.join(archive);

    let file = match File::open(&zip_path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!("Error: Zip file not found at {}", zip_path.display());
            return ExtractOutcome::Missing { path: zip_path };
        }
        Err(err) => return failed(archive, err.to_string()),
    };

    match unpack(file, destination) {
        Ok(entries) => {
            info!(archive, entries, "Successfully extracted {archive}");
            ExtractOutcome::Extracted {
                archive: archive.to_string(),
                entries,
            }
        }
        Err(err) => failed(archive, err.to_string()),
    }
}

fn unpack(file: File, destination: &Path) -> Result<usize> {
    let mut zip = ZipArchive::new(file)?;
    fs::create_dir_all(destination)?;
    zip.extract(destination)?;
    Ok(zip.len())
}

fn failed(archive: &str, reason: String) -> ExtractOutcome {
    error!("Error extracting {archive}: {reason}");
    ExtractOutcome::Failed {
        archive: archive.to_string(),
        reason,
    }
}
