//! Sample records and the in-memory dataset they form.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use super::metric::Metric;

/// Canonical CSV column names, as produced by the acquisition tooling.
pub mod columns {
    pub const SERIAL_NUMBER: &str = "SerialNumber";
    pub const CHANNEL: &str = "Channel";
    pub const SAMPLE_COUNT: &str = "SampleCount";
    pub const DATE: &str = "Date";
    pub const TIME: &str = "Time";
    pub const FILE_MTIME: &str = "FileMTime";

    // Derived by normalization / run segmentation.
    pub const SERIAL_ID: &str = "SerialID";
    pub const X: &str = "X";
    pub const TIMESTAMP: &str = "Timestamp";
    pub const RUN_INDEX: &str = "RunIndex";
}

/// Identifies one physical measurement sequence: a device serial plus an optional channel.
///
/// `None` channels sort after every numbered channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub serial: String,
    pub channel: Option<i64>,
}

impl Ord for SeriesKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.serial
            .cmp(&other.serial)
            .then_with(|| cmp_nulls_last(&self.channel, &other.channel))
    }
}

impl PartialOrd for SeriesKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Order optional values with `None` after every `Some`.
pub(crate) fn cmp_nulls_last<T: PartialOrd>(a: &Option<T>, b: &Option<T>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One row of the normalized dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    /// Device serial with surrounding whitespace stripped.
    pub serial: String,
    pub channel: Option<i64>,
    pub sample_count: Option<f64>,
    /// X-axis value; identical to `sample_count`.
    pub x: Option<f64>,
    pub timestamp: Option<NaiveDateTime>,
    /// Metric values indexed by [`Metric::index`].
    pub metrics: [Option<f64>; Metric::COUNT],
    /// Assigned by run segmentation; 0 until then.
    pub run_index: u32,
    /// The original CSV fields, aligned with [`Dataset::headers`].
    pub raw: Vec<String>,
}

impl SampleRecord {
    /// A record with only the identifying fields set. Mostly useful in tests.
    pub fn new(serial: impl Into<String>, channel: Option<i64>, x: Option<f64>) -> Self {
        Self {
            serial: serial.into(),
            channel,
            sample_count: x,
            x,
            timestamp: None,
            metrics: [None; Metric::COUNT],
            run_index: 0,
            raw: Vec::new(),
        }
    }

    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        self.metrics[metric.index()] = Some(value);
        self
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics[metric.index()]
    }

    pub fn key(&self) -> SeriesKey {
        SeriesKey {
            serial: self.serial.clone(),
            channel: self.channel,
        }
    }

    pub fn same_series(&self, other: &SampleRecord) -> bool {
        self.serial == other.serial && self.channel == other.channel
    }
}

/// The full collection of sample records from one upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Column names of the uploaded CSV, in file order.
    pub headers: Vec<String>,
    pub records: Vec<SampleRecord>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, records: Vec<SampleRecord>) -> Self {
        Self { headers, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct device serials, sorted ascending.
    pub fn serials(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.serial.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Distinct (serial, channel) series, sorted.
    pub fn series_keys(&self) -> Vec<SeriesKey> {
        self.records
            .iter()
            .map(SampleRecord::key)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest timestamp, if any record carries one.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut it = self.records.iter().filter_map(|r| r.timestamp);
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }
}
