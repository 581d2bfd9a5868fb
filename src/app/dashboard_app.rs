//! Standalone application wrapper.
//!
//! [`DashboardApp`] owns the [`DashboardState`] plus the panels that render it,
//! and implements [`eframe::App`] so the dashboard can run as a native window.

use eframe::egui;
use egui::{Color32, RichText};
use egui_phosphor::regular::{MOON, SUN};

use crate::config::{DashboardConfig, Theme};
use crate::panels::{ControlsPanel, Panel, PlotPanel, StatsPanel};

use super::state::{DashboardEvent, DashboardState, Status};

pub struct DashboardApp {
    pub state: DashboardState,
    pub title: String,
    pub controls: ControlsPanel,
    pub plot: PlotPanel,
    pub stats: StatsPanel,
    pub theme: Theme,
    /// Flag so the theme is only applied when it changes.
    theme_applied: bool,
}

impl DashboardApp {
    pub fn new(cfg: &DashboardConfig) -> Self {
        let mut plot = PlotPanel::default();
        plot.plot_height = cfg.plot_height;
        let mut state = DashboardState::new(cfg);
        state.recompute();
        Self {
            state,
            title: cfg.title.clone(),
            controls: ControlsPanel::default(),
            plot,
            stats: StatsPanel::default(),
            theme: cfg.theme,
            theme_applied: false,
        }
    }

    /// Turn files dropped onto the window into upload events.
    fn dropped_uploads(ctx: &egui::Context) -> Vec<DashboardEvent> {
        let files = ctx.input(|i| i.raw.dropped_files.clone());
        files
            .into_iter()
            .filter_map(|f| {
                if let Some(bytes) = f.bytes {
                    return Some(DashboardEvent::Upload {
                        source: f.name,
                        bytes: bytes.to_vec(),
                    });
                }
                let path = f.path?;
                match std::fs::read(&path) {
                    Ok(bytes) => Some(DashboardEvent::Upload {
                        source: path.display().to_string(),
                        bytes,
                    }),
                    Err(e) => {
                        log::error!("Failed to read dropped file {}: {e}", path.display());
                        None
                    }
                }
            })
            .collect()
    }

    /// Show/hide toggles for the plot and statistics panels.
    fn render_view_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("View", |ui| {
            let panels: [&mut dyn Panel; 2] = [&mut self.plot, &mut self.stats];
            for panel in panels {
                let mut shown = panel.is_visible();
                if ui.checkbox(&mut shown, panel.title_and_icon()).changed() {
                    panel.set_visible(shown);
                }
            }
        });
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            match &self.state.status {
                Status::Idle => {
                    ui.weak("📂 Drag & drop a stability CSV or use Upload");
                }
                Status::Info(msg) => {
                    ui.label(msg);
                }
                Status::Error(msg) => {
                    ui.label(RichText::new(msg).color(Color32::from_rgb(0xB9, 0x4A, 0x48)));
                }
            }
            if let Some(ov) = self.state.session.overview() {
                ui.separator();
                ui.weak(format!(
                    "{} rows · {} serials · {} runs · {} rows in latest runs",
                    ov.rows, ov.serials, ov.runs, ov.latest_rows
                ));
                if let Some((first, last)) = ov.time_span {
                    ui.separator();
                    ui.weak(format!(
                        "{} – {}",
                        first.format("%Y-%m-%d %H:%M"),
                        last.format("%Y-%m-%d %H:%M")
                    ));
                }
            }
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            self.theme.apply(ctx);
            self.theme_applied = true;
        }

        for event in Self::dropped_uploads(ctx) {
            self.state.dispatch(event);
        }

        egui::TopBottomPanel::top("dashboard_top").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading(&self.title);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let icon = match self.theme {
                        Theme::Dark => SUN,
                        Theme::Light => MOON,
                    };
                    if ui
                        .button(icon)
                        .on_hover_text(format!("Switch to {} theme", self.theme.toggled().label()))
                        .clicked()
                    {
                        self.theme = self.theme.toggled();
                        self.theme_applied = false;
                    }
                    self.stats.render_menu(ui, &mut self.state);
                    self.plot.render_menu(ui, &mut self.state);
                    self.render_view_menu(ui);
                });
            });
            ui.separator();
            self.controls.render_panel(ui, &mut self.state);
            self.render_status(ui);
            ui.add_space(4.0);
        });

        if self.stats.is_visible() {
            egui::TopBottomPanel::bottom("dashboard_stats")
                .resizable(true)
                .min_height(120.0)
                .default_height(260.0)
                .show(ctx, |ui| {
                    self.stats.render_panel(ui, &mut self.state);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.plot.is_visible() {
                return;
            }
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.plot.render_panel(ui, &mut self.state);
            });
        });
    }
}
