use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;

use crate::errors::SheetError;
use crate::frame::require_column;

/// Minute precision, used for every join key.
pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Abbreviated month, zero-padded day, 4-digit year, 12-hour clock with AM/PM.
pub const STATUS_FORMAT: &str = "%b %d, %Y %I:%M:%S %p";

/// Rendering of datetime cells written as text.
pub const CELL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    STATUS_FORMAT,
    "%b %d, %Y %H:%M:%S",
];

static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%b %d, %Y"];

/// Parses a textual timestamp in any of the layouts the building exports use.
/// Month-first is assumed for slash-separated dates.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Converts an Excel serial date (days since 1899-12-30, 1900 date system) to a
/// timestamp, rounded to the millisecond.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

pub(crate) fn naive_from_epoch(raw: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let dt = match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(raw)?,
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(raw)?,
        TimeUnit::Nanoseconds => DateTime::from_timestamp_nanos(raw),
    };
    Some(dt.naive_utc())
}

pub(crate) fn naive_to_micros(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_micros()
}

/// Reads a column as timestamps. Text is parsed with [`parse_timestamp`], numbers
/// are treated as Excel serial dates, datetime columns are taken as is. Nulls and
/// blank strings come back as `None`.
pub fn timestamps(df: &DataFrame, column: &str) -> Result<Vec<Option<NaiveDateTime>>, SheetError> {
    let col = require_column(df, column)?;

    match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                None => Ok(None),
                Some(text) if text.trim().is_empty() => Ok(None),
                Some(text) => parse_timestamp(text)
                    .map(Some)
                    .ok_or_else(|| SheetError::Timestamp {
                        column: column.to_string(),
                        row,
                        value: text.to_string(),
                    }),
            })
            .collect(),
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let physical = col.cast(&DataType::Int64)?;
            let values = physical
                .i64()?
                .into_iter()
                .map(|raw| raw.and_then(|raw| naive_from_epoch(raw, unit)))
                .collect();
            Ok(values)
        }
        DataType::Float64 => col
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                None => Ok(None),
                Some(serial) => excel_serial_to_datetime(serial)
                    .map(Some)
                    .ok_or_else(|| SheetError::Timestamp {
                        column: column.to_string(),
                        row,
                        value: serial.to_string(),
                    }),
            })
            .collect(),
        DataType::Null => Ok(vec![None; col.len()]),
        other => Err(SheetError::TimestampType {
            column: column.to_string(),
            dtype: other.to_string(),
        }),
    }
}

/// Replaces `column` with its timestamps rendered through `format`. The column
/// keeps its position; nulls stay null.
pub fn format_timestamp_column(
    df: &mut DataFrame,
    column: &str,
    format: &str,
) -> Result<(), SheetError> {
    let formatted: Vec<Option<String>> = timestamps(df, column)?
        .into_iter()
        .map(|value| value.map(|dt| dt.format(format).to_string()))
        .collect();

    df.with_column(Series::new(column.into(), formatted))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_month_first_twelve_hour_layout() {
        let dt = parse_timestamp("01/05/2024 01:30:00 PM").expect("parse");
        assert_eq!(dt.format(MINUTE_FORMAT).to_string(), "2024-01-05 13:30");
    }

    #[test]
    fn formatting_is_idempotent() {
        let once = parse_timestamp("2024-03-07 18:04:59")
            .expect("parse")
            .format(STATUS_FORMAT)
            .to_string();
        assert_eq!(once, "Mar 07, 2024 06:04:59 PM");

        let twice = parse_timestamp(&once)
            .expect("reparse")
            .format(STATUS_FORMAT)
            .to_string();
        assert_eq!(once, twice);

        let minute = parse_timestamp("2024-03-07 18:04").expect("parse minute");
        assert_eq!(minute.format(MINUTE_FORMAT).to_string(), "2024-03-07 18:04");
    }

    #[test]
    fn excel_serial_dates_convert() {
        let dt = excel_serial_to_datetime(45_292.5).expect("serial");
        assert_eq!(dt.format(CELL_FORMAT).to_string(), "2024-01-01 12:00:00");
        assert!(excel_serial_to_datetime(f64::NAN).is_none());
    }

    #[test]
    fn blank_text_is_not_a_timestamp() {
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn numeric_column_is_read_as_serial_dates() {
        let mut df = df!["stamp" => [Some(45_292.5), None]].unwrap();
        format_timestamp_column(&mut df, "stamp", MINUTE_FORMAT).unwrap();

        let values: Vec<Option<&str>> = df
            .column("stamp")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some("2024-01-01 12:00"), None]);
    }
}
