//! Session-scoped dataset storage.
//!
//! A [`Session`] owns the dataset of the most recent successful upload. Every
//! upload replaces it wholesale and rewrites the mirror file; a rejected upload
//! leaves the session untouched.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use super::ingest::{decode_data_uri, ingest_bytes, write_mirror, IngestError};
use super::record::Dataset;
use super::runs::{keep_latest_run_only, run_count};

/// Outcome of an accepted upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    pub source: String,
    pub rows: usize,
    /// Set when the dataset was accepted but the mirror file could not be written.
    pub mirror_error: Option<String>,
}

/// Counts shown in the status line.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOverview {
    pub rows: usize,
    pub latest_rows: usize,
    pub serials: usize,
    pub runs: usize,
    pub time_span: Option<(NaiveDateTime, NaiveDateTime)>,
}

#[derive(Debug, Clone)]
pub struct Session {
    mirror_path: Option<PathBuf>,
    dataset: Option<Dataset>,
    latest: Option<Dataset>,
    source: Option<String>,
}

impl Session {
    /// A session that mirrors each upload to `mirror_path` (or nowhere if `None`).
    pub fn new(mirror_path: Option<PathBuf>) -> Self {
        Self {
            mirror_path,
            dataset: None,
            latest: None,
            source: None,
        }
    }

    /// The full run-indexed dataset of the last upload.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// The last upload reduced to the latest run of every series.
    pub fn latest(&self) -> Option<&Dataset> {
        self.latest.as_ref()
    }

    /// Name of the file (or payload) the current dataset came from.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn has_data(&self) -> bool {
        self.dataset.is_some()
    }

    /// Ingest an upload given as raw CSV bytes.
    pub fn upload_bytes(
        &mut self,
        source: impl Into<String>,
        bytes: &[u8],
    ) -> Result<UploadReport, IngestError> {
        let source = source.into();
        let dataset = ingest_bytes(bytes).map_err(|e| {
            log::error!("rejected upload {source}: {e}");
            e
        })?;
        Ok(self.replace(source, dataset))
    }

    /// Ingest an upload given as a `<prefix>,<base64>` payload.
    pub fn upload_data_uri(
        &mut self,
        source: impl Into<String>,
        contents: &str,
    ) -> Result<UploadReport, IngestError> {
        let source = source.into();
        let bytes = decode_data_uri(contents).map_err(|e| {
            log::error!("rejected upload {source}: {e}");
            e
        })?;
        self.upload_bytes(source, &bytes)
    }

    fn replace(&mut self, source: String, dataset: Dataset) -> UploadReport {
        let mirror_error = self.mirror_path.as_ref().and_then(|path| {
            write_mirror(path, &dataset).err().map(|e| {
                log::warn!("{e:#}");
                format!("{e:#}")
            })
        });
        let rows = dataset.len();
        log::info!(
            "loaded {rows} rows for {} serials from {source}",
            dataset.serials().len()
        );
        self.latest = Some(keep_latest_run_only(&dataset));
        self.dataset = Some(dataset);
        self.source = Some(source.clone());
        UploadReport {
            source,
            rows,
            mirror_error,
        }
    }

    pub fn overview(&self) -> Option<DatasetOverview> {
        let dataset = self.dataset.as_ref()?;
        let latest_rows = self.latest.as_ref().map_or(0, Dataset::len);
        Some(DatasetOverview {
            rows: dataset.len(),
            latest_rows,
            serials: dataset.serials().len(),
            runs: run_count(dataset),
            time_span: dataset.time_span(),
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(None)
    }
}
