//! Column names of the cleaned tables.

pub const STATUS_TIMESTAMP: &str = "Fecha";
pub const STATUS_ON: &str = "Encendido";
pub const UNIT: &str = "Unidad de AC";

pub const STATUS_COLUMNS: [&str; 3] = [STATUS_TIMESTAMP, STATUS_ON, UNIT];

pub const DATE_TIME: &str = "date_time";
pub const GENERAL_ENERGY: &str = "general_energy(kWh)";
pub const AC_ENERGY: &str = "AC_energy(kWh)";
pub const CELSIUS: &str = "celcius";
