use std::collections::HashSet;

use stabilityview::data::stats::write_summary_csv;
use stabilityview::{summarize, Dataset, Metric, SampleRecord};

fn dataset() -> Dataset {
    Dataset::new(
        vec![],
        vec![
            SampleRecord::new("A", Some(1), Some(1.0))
                .with_metric(Metric::Raw, 1.0)
                .with_metric(Metric::Hgo, 10.0),
            SampleRecord::new("A", Some(1), Some(2.0)).with_metric(Metric::Raw, 3.0),
            SampleRecord::new("A", None, Some(1.0)).with_metric(Metric::Raw, 5.0),
            SampleRecord::new("B", Some(2), Some(1.0)),
        ],
    )
}

#[test]
fn one_row_per_observed_combination() {
    let ds = dataset();
    let rows = summarize(&ds);

    let mut combos = HashSet::new();
    for r in &ds.records {
        for m in Metric::ALL {
            if r.metric(m).is_some() {
                combos.insert((r.serial.clone(), r.channel, m));
            }
        }
    }
    assert_eq!(rows.len(), combos.len());
    assert!(rows.iter().all(|r| r.serial != "B"));
}

#[test]
fn rows_are_sorted_and_computed() {
    let rows = summarize(&dataset());
    let keys: Vec<(&str, Option<i64>, Metric)> = rows
        .iter()
        .map(|r| (r.serial.as_str(), r.channel, r.metric))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("A", Some(1), Metric::Hgo),
            ("A", Some(1), Metric::Raw),
            ("A", None, Metric::Raw),
        ]
    );

    let raw = &rows[1];
    assert_eq!(raw.mean, 2.0);
    assert_eq!(raw.count, 2);
    assert!((raw.std_dev.unwrap() - 2.0_f64.sqrt()).abs() < 1e-12);

    assert_eq!(rows[0].count, 1);
    assert_eq!(rows[0].std_dev, None);
}

#[test]
fn summary_csv_has_table_columns() {
    let mut buf = Vec::new();
    write_summary_csv(&mut buf, &summarize(&dataset())).unwrap();
    let s = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = s.trim().split('\n').collect();
    assert_eq!(lines[0], "SerialNumber,Channel,Metric,Mean,StdDev,N");
    assert_eq!(lines[1], "A,1,HGO,10,,1");
    assert_eq!(lines[3], "A,,RAW,5,,1");
}
