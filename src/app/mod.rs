//! Dashboard application shell.
//!
//! | Sub-module        | Responsibility |
//! | ----------------- | -------------- |
//! | [`state`]         | UI-independent state, events and recomputation |
//! | [`dashboard_app`] | [`DashboardApp`] (eframe) wrapper: layout, file drops, theme |
//! | [`run`]           | Top-level [`run_dashboard()`] entry point |

mod dashboard_app;
mod run;
mod state;

pub use dashboard_app::DashboardApp;
pub use run::run_dashboard;
pub use state::{DashboardEvent, DashboardState, Status};
