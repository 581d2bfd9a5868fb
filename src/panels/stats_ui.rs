use egui::Ui;
use egui_phosphor::regular::EXPORT;
use egui_table::{HeaderRow as EgHeaderRow, Table, TableDelegate};

use super::panel_trait::{Panel, PanelState};
use crate::app::DashboardState;
use crate::data::stats::{write_summary_csv_path, SummaryRow};

pub const SUMMARY_COLUMNS: [&str; 6] = ["SerialNumber", "Channel", "Metric", "Mean", "StdDev", "N"];

/// Format a statistic the way the table shows it.
pub fn format_stat(v: f64) -> String {
    if v == 0.0 || (1e-3..1e6).contains(&v.abs()) {
        format!("{v:.4}")
    } else {
        format!("{v:.4e}")
    }
}

pub struct StatsPanel {
    pub state: PanelState,
}

impl Default for StatsPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Statistics", "📊"),
        }
    }
}

impl StatsPanel {
    pub const EXPORT_LABEL: &'static str = "Summary as CSV";
}

struct SummaryDelegate<'a> {
    rows: &'a [SummaryRow],
}

impl TableDelegate for SummaryDelegate<'_> {
    fn header_cell_ui(&mut self, ui: &mut egui::Ui, cell: &egui_table::HeaderCellInfo) {
        let text = SUMMARY_COLUMNS
            .get(cell.col_range.start)
            .copied()
            .unwrap_or("");
        ui.add_space(4.0);
        ui.strong(text);
    }

    fn cell_ui(&mut self, ui: &mut egui::Ui, cell: &egui_table::CellInfo) {
        let Some(r) = self.rows.get(cell.row_nr as usize) else {
            return;
        };
        ui.add_space(4.0);
        match cell.col_nr {
            0 => {
                ui.add(egui::Label::new(&r.serial).truncate());
            }
            1 => {
                ui.label(r.channel.map(|c| c.to_string()).unwrap_or_default());
            }
            2 => {
                ui.label(r.metric.column());
            }
            3 => {
                ui.label(format_stat(r.mean));
            }
            4 => {
                ui.label(r.std_dev.map(format_stat).unwrap_or_default());
            }
            5 => {
                ui.label(r.count.to_string());
            }
            _ => {}
        }
    }
}

impl Panel for StatsPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_menu(&mut self, ui: &mut Ui, state: &mut DashboardState) {
        ui.menu_button(format!("{EXPORT} Export"), |ui| {
            let enabled = !state.summary().is_empty();
            if ui
                .add_enabled(enabled, egui::Button::new(Self::EXPORT_LABEL))
                .clicked()
            {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name("summary.csv")
                    .add_filter("CSV", &["csv"])
                    .save_file()
                {
                    if let Err(e) = write_summary_csv_path(&path, state.summary()) {
                        log::error!("Failed to export summary CSV: {e:#}");
                    }
                }
                ui.close();
            }
        });
    }

    fn render_panel(&mut self, ui: &mut Ui, state: &mut DashboardState) {
        let rows = state.summary();
        ui.strong(self.title_and_icon());
        if rows.is_empty() {
            ui.weak("No data");
            return;
        }

        let mut delegate = SummaryDelegate { rows };
        let cols = vec![
            egui_table::Column::new(160.0),
            egui_table::Column::new(80.0),
            egui_table::Column::new(80.0),
            egui_table::Column::new(130.0),
            egui_table::Column::new(130.0),
            egui_table::Column::new(70.0),
        ];
        let avail_w = ui.available_width();
        let remaining_h = ui.available_height().max(160.0);
        let (rect, _resp) =
            ui.allocate_exact_size(egui::vec2(avail_w, remaining_h), egui::Sense::hover());
        let ui_builder = egui::UiBuilder::new()
            .max_rect(rect)
            .layout(egui::Layout::left_to_right(egui::Align::Min));
        let mut table_ui = ui.new_child(ui_builder);
        Table::new()
            .id_salt("summary_table")
            .num_rows(rows.len() as u64)
            .columns(cols)
            .headers(vec![EgHeaderRow::new(24.0)])
            .show(&mut table_ui, &mut delegate);
    }
}
