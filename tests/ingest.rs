use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use stabilityview::data::ingest::{decode_data_uri, read_csv, write_mirror};
use stabilityview::{ingest_bytes, ingest_data_uri, IngestError, Session};

const CSV: &str = "SerialNumber,Channel,SampleCount,RAW\n\
B,1,1,10\n\
A,1,1,1\n\
A,1,2,2\n\
A,1,3,3\n\
A,1,1,4\n\
A,1,2,5\n";

fn data_uri(csv: &str) -> String {
    format!("data:text/csv;base64,{}", STANDARD.encode(csv))
}

#[test]
fn decodes_data_uri_payload() {
    let bytes = decode_data_uri(&data_uri("a,b\n1,2\n")).unwrap();
    assert_eq!(bytes, b"a,b\n1,2\n");
}

#[test]
fn rejects_payload_without_separator() {
    assert!(matches!(
        decode_data_uri("bm90IGEgdXJp"),
        Err(IngestError::MalformedPayload)
    ));
}

#[test]
fn rejects_invalid_base64() {
    assert!(matches!(
        decode_data_uri("data:text/csv;base64,@@@"),
        Err(IngestError::Base64(_))
    ));
}

#[test]
fn data_uri_and_bytes_agree() {
    let a = ingest_data_uri(&data_uri(CSV)).unwrap();
    let b = ingest_bytes(CSV.as_bytes()).unwrap();
    assert_eq!(a, b);
    let runs: Vec<(String, u32)> = a
        .records
        .iter()
        .map(|r| (r.serial.clone(), r.run_index))
        .collect();
    assert_eq!(
        runs,
        vec![
            ("A".into(), 0),
            ("A".into(), 0),
            ("A".into(), 0),
            ("A".into(), 1),
            ("A".into(), 1),
            ("B".into(), 0),
        ]
    );
}

#[test]
fn schema_errors_surface_as_ingest_errors() {
    let err = ingest_bytes(b"Channel\n1\n").unwrap_err();
    assert!(matches!(err, IngestError::Schema(_)));
    assert_eq!(err.to_string(), "Missing SerialNumber column");
}

#[test]
fn mirror_file_holds_normalized_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    let ds = ingest_bytes(b"SerialNumber,Channel,SampleCount,RAW\n A ,2.5,3,7\n").unwrap();
    write_mirror(&path, &ds).unwrap();

    let table = read_csv(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(
        table.headers,
        vec![
            "SerialNumber",
            "Channel",
            "SampleCount",
            "RAW",
            "SerialID",
            "X",
            "Timestamp",
            "RunIndex"
        ]
    );
    assert_eq!(table.rows[0], vec![" A ", "", "3", "7", "A", "3", "", "0"]);
}

#[test]
fn session_replaces_dataset_and_overwrites_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mirror.csv");
    let mut session = Session::new(Some(path.clone()));
    assert!(!session.has_data());

    let report = session.upload_bytes("first.csv", CSV.as_bytes()).unwrap();
    assert_eq!(report.rows, 6);
    assert_eq!(report.mirror_error, None);
    assert_eq!(session.latest().unwrap().len(), 3);
    assert_eq!(read_csv(std::fs::File::open(&path).unwrap()).unwrap().rows.len(), 6);

    session
        .upload_data_uri("second.csv", &data_uri("SerialNumber\nZ\n"))
        .unwrap();
    assert_eq!(session.dataset().unwrap().serials(), vec!["Z".to_string()]);
    assert_eq!(session.source(), Some("second.csv"));
    assert_eq!(read_csv(std::fs::File::open(&path).unwrap()).unwrap().rows.len(), 1);
}

#[test]
fn rejected_upload_leaves_session_untouched() {
    let mut session = Session::new(None);
    session.upload_bytes("good.csv", CSV.as_bytes()).unwrap();
    let before = session.dataset().cloned();

    assert!(session.upload_bytes("bad.csv", b"Nope\n1\n").is_err());
    assert!(session.upload_data_uri("bad", "no-comma").is_err());
    assert_eq!(session.dataset().cloned(), before);
    assert_eq!(session.source(), Some("good.csv"));
}

#[test]
fn mirror_failure_does_not_reject_upload() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened as a file.
    let mut session = Session::new(Some(dir.path().to_path_buf()));
    let report = session.upload_bytes("x.csv", CSV.as_bytes()).unwrap();
    assert!(report.mirror_error.is_some());
    assert!(session.has_data());
}

#[test]
fn overview_counts_runs_and_rows() {
    let mut session = Session::new(None);
    session.upload_bytes("x.csv", CSV.as_bytes()).unwrap();
    let ov = session.overview().unwrap();
    assert_eq!(ov.rows, 6);
    assert_eq!(ov.latest_rows, 3);
    assert_eq!(ov.serials, 2);
    assert_eq!(ov.runs, 3);
    assert_eq!(ov.time_span, None);
}

#[test]
fn overview_reports_timestamp_span() {
    let csv = "SerialNumber,Channel,SampleCount,Date,Time\n\
A,1,1,2024-05-06,12:00:00\n\
A,1,2,2024-05-06,08:30:00\n\
A,1,3,2024-05-07,09:15:30\n";
    let mut session = Session::new(None);
    session.upload_bytes("dated.csv", csv.as_bytes()).unwrap();
    let (first, last) = session.overview().unwrap().time_span.unwrap();
    assert_eq!(first.to_string(), "2024-05-06 08:30:00");
    assert_eq!(last.to_string(), "2024-05-07 09:15:30");
}
