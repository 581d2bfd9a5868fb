//! Column validation and type coercion for uploaded CSV tables.
//!
//! Unparseable fields never reject a row: they become `None`.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::ingest::RawTable;
use super::metric::Metric;
use super::record::{columns, Dataset, SampleRecord};

/// The uploaded table lacks a column the dashboard cannot work without.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    MissingColumn(&'static str),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::MissingColumn(c) => write!(f, "Missing {c} column"),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Date-time layouts tried, in order, on `"<Date> <Time>"`.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%Y%m%d %H%M%S",
];

/// Parse a numeric cell; blanks, garbage and non-finite values become `None`.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a channel cell. Only values that are exact integers survive.
pub fn parse_channel(s: &str) -> Option<i64> {
    let v = parse_number(s)?;
    if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// Parse a `Date` / `Time` pair.
pub fn parse_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    let time = time.trim();
    if date.is_empty() {
        return None;
    }
    let joined = format!("{date} {time}");
    let joined = joined.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(joined, fmt).ok())
        .or_else(|| {
            // A date without a time component means midnight.
            if time.is_empty() {
                NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            } else {
                None
            }
        })
}

/// Interpret a cell as seconds since the Unix epoch (UTC).
pub fn parse_epoch_seconds(s: &str) -> Option<NaiveDateTime> {
    let secs = parse_number(s)?;
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}

enum TimestampSource {
    DateTime { date: usize, time: usize },
    Epoch(usize),
    Absent,
}

impl TimestampSource {
    fn detect(table: &RawTable) -> Self {
        match (
            table.column_index(columns::DATE),
            table.column_index(columns::TIME),
        ) {
            (Some(date), Some(time)) => TimestampSource::DateTime { date, time },
            _ => match table.column_index(columns::FILE_MTIME) {
                Some(i) => TimestampSource::Epoch(i),
                None => TimestampSource::Absent,
            },
        }
    }

    fn timestamp(&self, row: &[String]) -> Option<NaiveDateTime> {
        match *self {
            TimestampSource::DateTime { date, time } => parse_date_time(&row[date], &row[time]),
            TimestampSource::Epoch(i) => parse_epoch_seconds(&row[i]),
            TimestampSource::Absent => None,
        }
    }
}

/// Validate required columns and coerce every row into a [`SampleRecord`].
///
/// Only the device serial column is mandatory. Missing optional columns yield
/// `None` for every row.
pub fn normalize(table: &RawTable) -> Result<Dataset, SchemaError> {
    let serial_col = table
        .column_index(columns::SERIAL_NUMBER)
        .ok_or(SchemaError::MissingColumn(columns::SERIAL_NUMBER))?;
    let channel_col = table.column_index(columns::CHANNEL);
    let count_col = table.column_index(columns::SAMPLE_COUNT);
    let metric_cols: Vec<(Metric, usize)> = Metric::ALL
        .into_iter()
        .filter_map(|m| table.column_index(m.column()).map(|i| (m, i)))
        .collect();
    let ts_source = TimestampSource::detect(table);

    if channel_col.is_none() {
        log::warn!("upload has no {} column; channels are null", columns::CHANNEL);
    }

    let records = table
        .rows
        .iter()
        .map(|row| {
            let sample_count = count_col.and_then(|i| parse_number(&row[i]));
            let mut metrics = [None; Metric::COUNT];
            for &(m, i) in &metric_cols {
                metrics[m.index()] = parse_number(&row[i]);
            }
            SampleRecord {
                serial: row[serial_col].trim().to_string(),
                channel: channel_col.and_then(|i| parse_channel(&row[i])),
                sample_count,
                x: sample_count,
                timestamp: ts_source.timestamp(row),
                metrics,
                run_index: 0,
                raw: row.clone(),
            }
        })
        .collect();

    Ok(Dataset::new(table.headers.clone(), records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_rejects_fractions() {
        assert_eq!(parse_channel("2"), Some(2));
        assert_eq!(parse_channel("2.0"), Some(2));
        assert_eq!(parse_channel("2.5"), None);
        assert_eq!(parse_channel("x"), None);
        assert_eq!(parse_channel(""), None);
    }

    #[test]
    fn number_rejects_non_finite() {
        assert_eq!(parse_number(" 4.5 "), Some(4.5));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn date_time_formats() {
        let a = parse_date_time("2024-03-01", "12:30:05").unwrap();
        let b = parse_date_time("03/01/2024", "12:30:05").unwrap();
        assert_eq!(a, b);
        assert!(parse_date_time("not a date", "12:00:00").is_none());
    }

    #[test]
    fn epoch_seconds() {
        let t = parse_epoch_seconds("0").unwrap();
        assert_eq!(t.to_string(), "1970-01-01 00:00:00");
        assert!(parse_epoch_seconds("abc").is_none());
    }
}
