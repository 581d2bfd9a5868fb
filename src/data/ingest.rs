//! Upload decoding, CSV parsing and the normalized-dataset mirror file.
//!
//! An upload arrives either as a data-URI style string (`<prefix>,<base64>`), as
//! produced by browser upload widgets, or as raw bytes read from disk. Both end up
//! in [`ingest_bytes`], which parses the CSV, normalizes it and assigns run indices.

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::record::{columns, Dataset, SampleRecord};
use super::runs::add_run_index;
use super::schema::{normalize, SchemaError};

/// Why an upload was rejected.
#[derive(Debug)]
pub enum IngestError {
    /// The payload had no `,` separating the prefix from the base64 body.
    MalformedPayload,
    Base64(base64::DecodeError),
    Csv(csv::Error),
    Schema(SchemaError),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::MalformedPayload => {
                write!(f, "upload payload is not of the form <prefix>,<base64>")
            }
            IngestError::Base64(e) => write!(f, "upload payload is not valid base64: {e}"),
            IngestError::Csv(e) => write!(f, "could not read CSV: {e}"),
            IngestError::Schema(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::MalformedPayload => None,
            IngestError::Base64(e) => Some(e),
            IngestError::Csv(e) => Some(e),
            IngestError::Schema(e) => Some(e),
        }
    }
}

impl From<base64::DecodeError> for IngestError {
    fn from(e: base64::DecodeError) -> Self {
        IngestError::Base64(e)
    }
}

impl From<csv::Error> for IngestError {
    fn from(e: csv::Error) -> Self {
        IngestError::Csv(e)
    }
}

impl From<SchemaError> for IngestError {
    fn from(e: SchemaError) -> Self {
        IngestError::Schema(e)
    }
}

/// A parsed but not yet normalized CSV: headers plus string cells.
///
/// Short rows are padded with empty cells so every row has `headers.len()` fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Decode a `<prefix>,<base64>` upload payload into raw bytes.
pub fn decode_data_uri(contents: &str) -> Result<Vec<u8>, IngestError> {
    let (_, body) = contents
        .split_once(',')
        .ok_or(IngestError::MalformedPayload)?;
    Ok(STANDARD.decode(body.trim())?)
}

/// Parse CSV text into a [`RawTable`].
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<String> = record.iter().map(str::to_owned).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }
    log::debug!("read {} CSV rows with {} columns", rows.len(), headers.len());
    Ok(RawTable { headers, rows })
}

/// Parse, normalize and run-index an uploaded CSV.
pub fn ingest_bytes(bytes: &[u8]) -> Result<Dataset, IngestError> {
    let table = read_csv(bytes)?;
    let dataset = normalize(&table)?;
    Ok(add_run_index(dataset))
}

/// Decode a data-URI upload and ingest it.
pub fn ingest_data_uri(contents: &str) -> Result<Dataset, IngestError> {
    let bytes = decode_data_uri(contents)?;
    ingest_bytes(&bytes)
}

/// Columns appended to (or overwritten in) the mirror file, in output order.
const DERIVED_COLUMNS: [&str; 6] = [
    columns::SERIAL_ID,
    columns::CHANNEL,
    columns::SAMPLE_COUNT,
    columns::X,
    columns::TIMESTAMP,
    columns::RUN_INDEX,
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

fn fmt_opt_f64(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn derived_value(rec: &SampleRecord, column: &str) -> Option<String> {
    let s = match column {
        columns::SERIAL_ID => rec.serial.clone(),
        columns::CHANNEL => rec.channel.map(|c| c.to_string()).unwrap_or_default(),
        columns::SAMPLE_COUNT => fmt_opt_f64(rec.sample_count),
        columns::X => fmt_opt_f64(rec.x),
        columns::TIMESTAMP => rec
            .timestamp
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default(),
        columns::RUN_INDEX => rec.run_index.to_string(),
        _ => return None,
    };
    Some(s)
}

/// Write the normalized dataset as CSV.
///
/// Input columns keep their position; columns that normalization redefines
/// (`Channel`, `SampleCount`, ...) carry the normalized values, and derived columns
/// missing from the input are appended.
pub fn write_dataset_csv<W: Write>(writer: W, dataset: &Dataset) -> Result<(), csv::Error> {
    let mut headers: Vec<&str> = dataset.headers.iter().map(String::as_str).collect();
    for col in DERIVED_COLUMNS {
        if !headers.contains(&col) {
            headers.push(col);
        }
    }

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&headers)?;
    for rec in &dataset.records {
        let row: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, col)| {
                derived_value(rec, col)
                    .or_else(|| rec.raw.get(i).cloned())
                    .unwrap_or_default()
            })
            .collect();
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Overwrite the mirror file at `path` with the normalized dataset.
pub fn write_mirror<P: AsRef<Path>>(path: P, dataset: &Dataset) -> anyhow::Result<()> {
    use anyhow::Context as _;
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create mirror file {}", path.display()))?;
    write_dataset_csv(std::io::BufWriter::new(file), dataset)
        .with_context(|| format!("failed to write mirror file {}", path.display()))?;
    log::info!("wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_are_padded() {
        let t = read_csv("a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(t.rows[0], vec!["1", "2", ""]);
    }

    #[test]
    fn derived_value_ignores_plain_columns() {
        let rec = SampleRecord::new("A", Some(1), Some(3.0));
        assert_eq!(derived_value(&rec, "RAW"), None);
        assert_eq!(derived_value(&rec, columns::X).as_deref(), Some("3"));
    }
}
