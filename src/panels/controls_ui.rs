//! Upload button, metric selector, serial comparator and split-threshold input.

use egui::Ui;
use egui_phosphor::regular::{FOLDER_OPEN, X};

use super::panel_trait::{Panel, PanelState};
use crate::app::{DashboardEvent, DashboardState};
use crate::data::metric::Metric;

pub struct ControlsPanel {
    pub state: PanelState,
    /// Free-text serial entry for serials not (yet) in the dataset.
    pub serial_entry: String,
}

impl Default for ControlsPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Controls", ""),
            serial_entry: String::new(),
        }
    }
}

impl ControlsPanel {
    pub const UPLOAD_LABEL: &'static str = "Upload CSV…";
    pub const ALL_SERIALS_LABEL: &'static str = "All serials";

    /// Ask for a CSV file and turn it into an upload event.
    fn pick_upload() -> Option<DashboardEvent> {
        let path = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .pick_file()?;
        match std::fs::read(&path) {
            Ok(bytes) => Some(DashboardEvent::Upload {
                source: path.display().to_string(),
                bytes,
            }),
            Err(e) => {
                log::error!("Failed to read {}: {e}", path.display());
                None
            }
        }
    }

    fn compare_button_text(state: &DashboardState) -> String {
        match state.compare.len() {
            0 => Self::ALL_SERIALS_LABEL.to_string(),
            1 => state.compare[0].clone(),
            n => format!("{n} serials"),
        }
    }
}

impl Panel for ControlsPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, state: &mut DashboardState) {
        let mut events: Vec<DashboardEvent> = Vec::new();

        ui.horizontal_wrapped(|ui| {
            if ui
                .button(format!("{FOLDER_OPEN} {}", Self::UPLOAD_LABEL))
                .on_hover_text("Load a stability CSV (or drop one onto the window)")
                .clicked()
            {
                events.extend(Self::pick_upload());
            }

            ui.separator();

            ui.label("Metric");
            let mut metric = state.metric;
            egui::ComboBox::from_id_salt("metric_select")
                .selected_text(metric.column())
                .width(90.0)
                .show_ui(ui, |ui| {
                    for m in Metric::ALL {
                        ui.selectable_value(&mut metric, m, m.column());
                    }
                });
            if metric != state.metric {
                events.push(DashboardEvent::SetMetric(metric));
            }

            ui.separator();

            ui.label("Compare Serials");
            ui.menu_button(Self::compare_button_text(state), |ui| {
                let options = state.serial_options();
                if options.is_empty() {
                    ui.weak("Upload a CSV to list serials");
                }
                egui::ScrollArea::vertical()
                    .max_height(320.0)
                    .show(ui, |ui| {
                        for serial in &options {
                            let mut checked = state.compare.contains(serial);
                            if ui.checkbox(&mut checked, serial).changed() {
                                events.push(DashboardEvent::ToggleSerial(serial.clone()));
                            }
                        }
                        // Requested serials absent from the current upload.
                        for serial in state.compare.iter().filter(|s| !options.contains(s)) {
                            let mut checked = true;
                            if ui
                                .checkbox(&mut checked, format!("{serial} (no data)"))
                                .changed()
                            {
                                events.push(DashboardEvent::ToggleSerial(serial.clone()));
                            }
                        }
                    });
                ui.separator();
                ui.horizontal(|ui| {
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.serial_entry)
                            .hint_text("Serial")
                            .desired_width(140.0),
                    );
                    let submitted =
                        resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    let add = ui.button("Add").clicked() || submitted;
                    if add && !self.serial_entry.trim().is_empty() {
                        let serial = self.serial_entry.trim().to_string();
                        if !state.compare.contains(&serial) {
                            events.push(DashboardEvent::ToggleSerial(serial));
                        }
                        self.serial_entry.clear();
                    }
                });
            });
            if !state.compare.is_empty()
                && ui
                    .small_button(X)
                    .on_hover_text("Clear comparison (show all serials)")
                    .clicked()
            {
                events.push(DashboardEvent::ClearCompare);
            }

            ui.separator();

            ui.label("Top Plot Samples");
            let mut split = state.split;
            if ui
                .add(egui::DragValue::new(&mut split).speed(1.0))
                .on_hover_text("Samples up to this count go to the top plot")
                .changed()
            {
                events.push(DashboardEvent::SetSplit(split));
            }
        });

        for event in events {
            state.dispatch(event);
        }
    }
}
