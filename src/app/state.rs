//! UI-independent dashboard state and its event dispatch.
//!
//! Every user interaction becomes a [`DashboardEvent`]. [`DashboardState::dispatch`]
//! applies it and recomputes all derived outputs (figure, label, warning, summary)
//! in one synchronous pass, so the whole shell can be exercised without egui.

use egui::Color32;

use crate::config::DashboardConfig;
use crate::data::metric::Metric;
use crate::data::session::Session;
use crate::data::stats::{summarize, SummaryRow};
use crate::figure::{build_figure, PlotOutput};

/// One user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// Raw CSV bytes from a file dialog or a dropped file.
    Upload { source: String, bytes: Vec<u8> },
    /// A `<prefix>,<base64>` payload.
    UploadDataUri { source: String, contents: String },
    SetMetric(Metric),
    SetCompare(Vec<String>),
    /// Add the serial to the comparison if absent, remove it otherwise.
    ToggleSerial(String),
    ClearCompare,
    SetSplit(i64),
}

/// Inline status line content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Info(String),
    Error(String),
}

pub struct DashboardState {
    pub session: Session,
    pub metric: Metric,
    /// Requested comparison serials; empty means all.
    pub compare: Vec<String>,
    pub split: i64,
    pub palette: Vec<Color32>,
    pub status: Status,
    plot: PlotOutput,
    summary: Vec<SummaryRow>,
}

impl DashboardState {
    pub fn new(cfg: &DashboardConfig) -> Self {
        Self {
            session: Session::new(cfg.mirror_path.clone()),
            metric: cfg.default_metric,
            compare: Vec::new(),
            split: cfg.default_split,
            palette: cfg.palette.clone(),
            status: Status::Idle,
            plot: PlotOutput::default(),
            summary: Vec::new(),
        }
    }

    pub fn plot(&self) -> &PlotOutput {
        &self.plot
    }

    pub fn summary(&self) -> &[SummaryRow] {
        &self.summary
    }

    /// Serials offered by the comparison selector: those of the latest upload.
    pub fn serial_options(&self) -> Vec<String> {
        self.session
            .dataset()
            .map(|d| d.serials())
            .unwrap_or_default()
    }

    pub fn dispatch(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Upload { source, bytes } => {
                let result = self.session.upload_bytes(source, &bytes);
                self.set_upload_status(result);
            }
            DashboardEvent::UploadDataUri { source, contents } => {
                let result = self.session.upload_data_uri(source, &contents);
                self.set_upload_status(result);
            }
            DashboardEvent::SetMetric(m) => self.metric = m,
            DashboardEvent::SetCompare(serials) => self.compare = serials,
            DashboardEvent::ToggleSerial(serial) => {
                if let Some(pos) = self.compare.iter().position(|s| *s == serial) {
                    self.compare.remove(pos);
                } else {
                    self.compare.push(serial);
                }
            }
            DashboardEvent::ClearCompare => self.compare.clear(),
            DashboardEvent::SetSplit(split) => self.split = split,
        }
        self.recompute();
    }

    fn set_upload_status(
        &mut self,
        result: Result<crate::data::session::UploadReport, crate::data::ingest::IngestError>,
    ) {
        self.status = match result {
            Ok(report) => match report.mirror_error {
                Some(e) => Status::Error(format!(
                    "Loaded {} rows from {}, but {e}",
                    report.rows, report.source
                )),
                None => Status::Info(format!("Loaded {} rows from {}", report.rows, report.source)),
            },
            Err(e) => Status::Error(format!("Upload rejected: {e}")),
        };
    }

    /// Rebuild every derived output from the current inputs.
    pub fn recompute(&mut self) {
        match self.session.latest() {
            Some(latest) => {
                self.plot =
                    build_figure(latest, self.metric, &self.compare, self.split, &self.palette);
                self.summary = summarize(latest);
            }
            None => {
                self.plot = PlotOutput::default();
                self.summary.clear();
            }
        }
        log::debug!(
            "recomputed: metric={} compare={:?} split={}",
            self.metric,
            self.compare,
            self.split
        );
    }
}
