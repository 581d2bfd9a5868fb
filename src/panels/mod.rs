pub mod controls_ui;
pub mod panel_trait;
pub mod plot_ui;
pub mod stats_ui;

pub use controls_ui::ControlsPanel;
pub use panel_trait::{Panel, PanelState};
pub use plot_ui::PlotPanel;
pub use stats_ui::StatsPanel;
