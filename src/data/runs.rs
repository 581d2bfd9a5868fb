//! Run segmentation: split each (serial, channel) sequence wherever the sample
//! counter restarts, and keep only the most recent run.

use std::collections::HashMap;

use super::record::{cmp_nulls_last, Dataset, SampleRecord, SeriesKey};

/// Label each record with its run index and sort the dataset by
/// (serial, channel, run, x).
///
/// Run boundaries are detected in acquisition (file) order within each series: a
/// row whose x is strictly smaller than the previous row's starts a new run. Equal
/// x values and missing x values never start a run. All sorts are stable.
pub fn add_run_index(mut dataset: Dataset) -> Dataset {
    dataset.records.sort_by(|a, b| {
        a.serial
            .cmp(&b.serial)
            .then_with(|| cmp_nulls_last(&a.channel, &b.channel))
    });

    let mut prev: Option<(usize, u32)> = None;
    for i in 0..dataset.records.len() {
        let run = match prev {
            Some((p, run)) if dataset.records[p].same_series(&dataset.records[i]) => {
                if is_boundary(&dataset.records[p], &dataset.records[i]) {
                    run + 1
                } else {
                    run
                }
            }
            _ => 0,
        };
        dataset.records[i].run_index = run;
        prev = Some((i, run));
    }

    dataset.records.sort_by(|a, b| {
        a.serial
            .cmp(&b.serial)
            .then_with(|| cmp_nulls_last(&a.channel, &b.channel))
            .then_with(|| a.run_index.cmp(&b.run_index))
            .then_with(|| cmp_nulls_last(&a.x, &b.x))
    });
    dataset
}

fn is_boundary(prev: &SampleRecord, cur: &SampleRecord) -> bool {
    match (prev.x, cur.x) {
        (Some(p), Some(c)) => c - p < 0.0,
        _ => false,
    }
}

/// Highest run index present for every series.
pub fn latest_runs(dataset: &Dataset) -> HashMap<SeriesKey, u32> {
    let mut latest: HashMap<SeriesKey, u32> = HashMap::new();
    for rec in &dataset.records {
        let entry = latest.entry(rec.key()).or_insert(rec.run_index);
        *entry = (*entry).max(rec.run_index);
    }
    latest
}

/// Keep only the rows belonging to the latest run of each series.
pub fn keep_latest_run_only(dataset: &Dataset) -> Dataset {
    let latest = latest_runs(dataset);
    let records = dataset
        .records
        .iter()
        .filter(|r| latest.get(&r.key()) == Some(&r.run_index))
        .cloned()
        .collect();
    Dataset::new(dataset.headers.clone(), records)
}

/// Number of distinct runs across all series.
pub fn run_count(dataset: &Dataset) -> usize {
    latest_runs(dataset).values().map(|&max| max as usize + 1).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(ds: &Dataset) -> Vec<Option<f64>> {
        ds.records.iter().map(|r| r.x).collect()
    }

    #[test]
    fn missing_x_never_splits() {
        let ds = Dataset::new(
            vec![],
            vec![
                SampleRecord::new("A", Some(1), Some(5.0)),
                SampleRecord::new("A", Some(1), None),
                SampleRecord::new("A", Some(1), Some(1.0)),
            ],
        );
        let ds = add_run_index(ds);
        assert!(ds.records.iter().all(|r| r.run_index == 0));
        assert_eq!(xs(&ds), vec![Some(1.0), Some(5.0), None]);
    }

    #[test]
    fn null_channel_is_its_own_series() {
        let ds = Dataset::new(
            vec![],
            vec![
                SampleRecord::new("A", None, Some(3.0)),
                SampleRecord::new("A", Some(0), Some(2.0)),
                SampleRecord::new("A", None, Some(1.0)),
            ],
        );
        let ds = add_run_index(ds);
        assert_eq!(ds.records[0].channel, Some(0));
        assert_eq!(ds.records[0].run_index, 0);
        let null_runs: Vec<u32> = ds.records[1..].iter().map(|r| r.run_index).collect();
        assert_eq!(null_runs, vec![0, 1]);
        assert_eq!(run_count(&ds), 3);
    }
}
