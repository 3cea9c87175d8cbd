use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Everything a run needs to know about where files live and how the source
/// exports are laid out. The defaults describe the standard `data_raw` /
/// `data_output` layout, so an empty TOML file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub raw_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Reject join inputs whose right-hand `date_time` repeats instead of
    /// letting the join fan out rows.
    pub require_unique_join_keys: bool,
    pub archives: ArchiveNames,
    pub units: UnitSettings,
    pub energy: EnergySettings,
    pub temperature: TemperatureSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveNames {
    pub units: String,
    pub energy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitSettings {
    pub file_prefix: String,
    pub extension: String,
    /// Metadata rows between the header row and the first reading.
    pub header_rows: usize,
    pub header_marker: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergySettings {
    pub ac_file: String,
    pub general_file: String,
    pub timestamp_column: String,
    pub ac_measure_column: String,
    pub general_measure_column: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureSettings {
    pub file: String,
    pub header_rows: usize,
    pub header_marker: String,
    pub merged_output: String,
    pub standalone_output: String,
}

const LOGGER_HEADER_ROWS: usize = 4;
const LOGGER_HEADER_MARKER: &str = "Log Data";

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data_raw"),
            output_dir: PathBuf::from("data_output"),
            require_unique_join_keys: true,
            archives: ArchiveNames::default(),
            units: UnitSettings::default(),
            energy: EnergySettings::default(),
            temperature: TemperatureSettings::default(),
        }
    }
}

impl Default for ArchiveNames {
    fn default() -> Self {
        Self {
            units: "Aires Acondicionados.zip".to_string(),
            energy: "Energia.zip".to_string(),
        }
    }
}

impl Default for UnitSettings {
    fn default() -> Self {
        Self {
            file_prefix: "AC".to_string(),
            extension: "xlsx".to_string(),
            header_rows: LOGGER_HEADER_ROWS,
            header_marker: LOGGER_HEADER_MARKER.to_string(),
            output: "Base1.xlsx".to_string(),
        }
    }
}

impl Default for EnergySettings {
    fn default() -> Self {
        Self {
            ac_file: "Energia AC.xls".to_string(),
            general_file: "Energía General.xls".to_string(),
            timestamp_column: "Date & Time".to_string(),
            ac_measure_column: "AIRE ACONDICIONADO->User Win Total(kWh)".to_string(),
            general_measure_column: "Medición General->User Win Total(kWh)".to_string(),
            output: "Base2.xlsx".to_string(),
        }
    }
}

impl Default for TemperatureSettings {
    fn default() -> Self {
        Self {
            file: "Temp Ext.xlsx".to_string(),
            header_rows: LOGGER_HEADER_ROWS,
            header_marker: LOGGER_HEADER_MARKER.to_string(),
            merged_output: "Base3.xlsx".to_string(),
            standalone_output: "temperature.xlsx".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Default layout rooted at explicit raw and output directories.
    pub fn with_dirs(raw_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|source| PipelineError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn raw_path(&self, file_name: &str) -> PathBuf {
        self.raw_dir.join(file_name)
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_standard_layout() {
        let config = PipelineConfig::from_toml_str("").expect("parse");
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.raw_path("Energia.zip"), PathBuf::from("data_raw/Energia.zip"));
        assert_eq!(config.units.header_rows, 4);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            output_dir = "/tmp/out"

            [temperature]
            header_rows = 2
            "#,
        )
        .expect("parse");

        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.raw_dir, PathBuf::from("data_raw"));
        assert_eq!(config.temperature.header_rows, 2);
        assert_eq!(config.temperature.file, "Temp Ext.xlsx");
        assert_eq!(config.energy, EnergySettings::default());
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(PipelineConfig::from_toml_str("require_unique_join_keys = \"yes\"").is_err());
    }
}
