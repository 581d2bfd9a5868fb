//! StabilityView crate root: re-exports and module wiring.
//!
//! A dashboard for device stability measurements built on egui/eframe:
//! - `data`: CSV ingestion, normalization, run segmentation, statistics and the session store
//! - `figure`: split-range figure construction with mean / ±σ overlays
//! - `panels`: egui panels for controls, plots and the summary table
//! - `app`: dashboard state, event dispatch and the eframe wrapper
//! - `config`: window defaults and the optional YAML config file

pub mod app;
pub mod config;
pub mod data;
pub mod figure;
pub mod panels;

// Public re-exports for a compact external API
pub use app::{run_dashboard, DashboardApp, DashboardEvent, DashboardState, Status};
pub use config::{DashboardConfig, Theme};
pub use data::ingest::{ingest_bytes, ingest_data_uri, IngestError};
pub use data::metric::Metric;
pub use data::record::{Dataset, SampleRecord, SeriesKey};
pub use data::runs::{add_run_index, keep_latest_run_only};
pub use data::schema::{normalize, SchemaError};
pub use data::session::Session;
pub use data::stats::{summarize, SummaryRow};
pub use figure::{build_figure, Figure, PlotOutput};
