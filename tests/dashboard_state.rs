use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use stabilityview::{DashboardConfig, DashboardEvent, DashboardState, Metric, Status};

const CSV: &str = "SerialNumber,Channel,SampleCount,RAW,LGO\n\
A,1,1,1,9\n\
A,1,2,3,9\n\
A,1,150,5,9\n\
A,1,1,100,9\n\
C,1,5,2,9\n";

fn state() -> DashboardState {
    let cfg = DashboardConfig {
        mirror_path: None,
        ..DashboardConfig::default()
    };
    let mut st = DashboardState::new(&cfg);
    st.recompute();
    st
}

fn upload(st: &mut DashboardState, csv: &str) {
    st.dispatch(DashboardEvent::Upload {
        source: "test.csv".into(),
        bytes: csv.as_bytes().to_vec(),
    });
}

#[test]
fn starts_empty_with_defaults() {
    let st = state();
    assert_eq!(st.metric, Metric::Raw);
    assert_eq!(st.split, 100);
    assert!(st.plot().figure.is_empty());
    assert_eq!(st.plot().label, "");
    assert_eq!(st.plot().warning, "");
    assert!(st.summary().is_empty());
    assert_eq!(st.status, Status::Idle);
    assert!(st.serial_options().is_empty());
}

#[test]
fn upload_populates_outputs_from_latest_run() {
    let mut st = state();
    upload(&mut st, CSV);
    assert!(matches!(st.status, Status::Info(_)));
    assert_eq!(st.serial_options(), vec!["A".to_string(), "C".to_string()]);

    // A restarted at sample 1, so only its last run (one row) remains.
    let top = &st.plot().figure.top;
    let a_series = top.traces_of("A").next().unwrap();
    assert_eq!(a_series.points, vec![[1.0, 100.0]]);
    assert!(st.plot().figure.bottom.traces.is_empty());
    assert_eq!(st.plot().label, "All serials (latest run)");

    assert_eq!(st.summary().len(), 4);
}

#[test]
fn control_changes_recompute() {
    let mut st = state();
    upload(&mut st, CSV);

    st.dispatch(DashboardEvent::SetMetric(Metric::Lgo));
    assert_eq!(st.plot().figure.top.title, "LGO 1–100");

    st.dispatch(DashboardEvent::SetSplit(0));
    assert!(st.plot().figure.top.traces.is_empty());
    assert_eq!(st.plot().figure.bottom.serials(), vec!["A", "C"]);

    st.dispatch(DashboardEvent::ToggleSerial("C".into()));
    st.dispatch(DashboardEvent::ToggleSerial("Q".into()));
    assert_eq!(st.plot().figure.bottom.serials(), vec!["C"]);
    assert_eq!(st.plot().warning, "⚠️ No data for: Q");

    st.dispatch(DashboardEvent::ToggleSerial("C".into()));
    assert_eq!(st.plot().label, "No valid serials selected");
    assert!(st.plot().figure.is_empty());

    st.dispatch(DashboardEvent::ClearCompare);
    assert_eq!(st.plot().label, "All serials (latest run)");
}

#[test]
fn selection_survives_a_new_upload() {
    let mut st = state();
    upload(&mut st, CSV);
    st.dispatch(DashboardEvent::SetCompare(vec!["A".into(), "C".into()]));

    st.dispatch(DashboardEvent::UploadDataUri {
        source: "second.csv".into(),
        contents: format!(
            "data:text/csv;base64,{}",
            STANDARD.encode("SerialNumber,SampleCount,RAW\nA,1,1\n")
        ),
    });
    assert_eq!(st.plot().figure.top.serials(), vec!["A"]);
    assert_eq!(st.plot().warning, "⚠️ No data for: C");
}

#[test]
fn rejected_upload_keeps_previous_outputs() {
    let mut st = state();
    upload(&mut st, CSV);
    let before = st.plot().clone();

    upload(&mut st, "Channel\n1\n");
    assert!(matches!(&st.status, Status::Error(msg) if msg.contains("SerialNumber")));
    assert_eq!(st.plot(), &before);
}
