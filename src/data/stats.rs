//! Descriptive statistics and the per-series summary table.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use super::metric::Metric;
use super::record::{Dataset, SeriesKey};

/// Mean, sample standard deviation and count of a set of observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub mean: f64,
    /// Sample standard deviation (N−1 divisor); `None` for fewer than two values.
    pub std_dev: Option<f64>,
    pub count: usize,
}

impl Moments {
    /// Compute moments of `values`; `None` when there are no values.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Moments> {
        let values: Vec<f64> = values.into_iter().collect();
        let count = values.len();
        if count == 0 {
            return None;
        }
        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = (count >= 2).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            (ss / (count - 1) as f64).sqrt()
        });
        Some(Moments {
            mean,
            std_dev,
            count,
        })
    }
}

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub serial: String,
    pub channel: Option<i64>,
    pub metric: Metric,
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub count: usize,
}

/// Summarise every (serial, channel, metric) combination that has at least one
/// observation. Rows are ordered by serial, channel (missing last) and metric.
pub fn summarize(dataset: &Dataset) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(SeriesKey, Metric), Vec<f64>> = BTreeMap::new();
    for rec in &dataset.records {
        for metric in Metric::ALL {
            if let Some(v) = rec.metric(metric) {
                groups.entry((rec.key(), metric)).or_default().push(v);
            }
        }
    }
    groups
        .into_iter()
        .filter_map(|((key, metric), values)| {
            let m = Moments::from_values(values)?;
            Some(SummaryRow {
                serial: key.serial,
                channel: key.channel,
                metric,
                mean: m.mean,
                std_dev: m.std_dev,
                count: m.count,
            })
        })
        .collect()
}

/// Write summary rows as CSV with the table's column headers.
pub fn write_summary_csv<W: Write>(writer: W, rows: &[SummaryRow]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["SerialNumber", "Channel", "Metric", "Mean", "StdDev", "N"])?;
    for r in rows {
        wtr.write_record([
            r.serial.clone(),
            r.channel.map(|c| c.to_string()).unwrap_or_default(),
            r.metric.to_string(),
            r.mean.to_string(),
            r.std_dev.map(|s| s.to_string()).unwrap_or_default(),
            r.count.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_summary_csv_path<P: AsRef<Path>>(path: P, rows: &[SummaryRow]) -> anyhow::Result<()> {
    use anyhow::Context as _;
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_summary_csv(file, rows).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("exported {} summary rows to {}", rows.len(), path.display());
    Ok(())
}
