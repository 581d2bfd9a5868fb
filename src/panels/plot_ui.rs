//! Draws a [`Figure`] as two stacked egui_plot panels with the scope label and
//! warning line above them.

use egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot};

use super::panel_trait::{Panel, PanelState};
use crate::app::DashboardState;
use crate::figure::{Dash, FigurePanel};

const WARNING_COLOR: Color32 = Color32::from_rgb(0xB9, 0x4A, 0x48);

pub struct PlotPanel {
    pub state: PanelState,
    pub plot_height: f32,
    /// Set to fit both plots to their data on the next frame.
    pub reset_view: bool,
}

impl Default for PlotPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Plot", "📈"),
            plot_height: 340.0,
            reset_view: false,
        }
    }
}

fn line_style(dash: Dash) -> LineStyle {
    match dash {
        Dash::Solid => LineStyle::Solid,
        Dash::Dashed => LineStyle::Dashed { length: 10.0 },
        Dash::Dotted => LineStyle::Dotted { spacing: 4.0 },
    }
}

impl PlotPanel {
    fn render_figure_panel(&mut self, ui: &mut Ui, id: &str, panel: &FigurePanel, legend: bool) {
        ui.strong(&panel.title);
        let mut plot = Plot::new(id)
            .height(self.plot_height)
            .x_axis_label("SampleCount");
        if legend {
            plot = plot.legend(Legend::default());
        }
        if self.reset_view {
            plot = plot.reset();
        }
        plot.show(ui, |plot_ui| {
            for trace in &panel.traces {
                // Unnamed items stay out of the legend.
                let name = if trace.show_legend {
                    trace.name.as_str()
                } else {
                    ""
                };
                plot_ui.line(
                    Line::new(name, trace.points.clone())
                        .color(trace.color)
                        .width(trace.width)
                        .style(line_style(trace.dash)),
                );
            }
        });
    }
}

impl Panel for PlotPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_menu(&mut self, ui: &mut Ui, _state: &mut DashboardState) {
        if ui
            .button("Fit to View")
            .on_hover_text("Fit both plots to their data")
            .clicked()
        {
            self.reset_view = true;
        }
    }

    fn render_panel(&mut self, ui: &mut Ui, state: &mut DashboardState) {
        let out = state.plot();
        ui.label(RichText::new(&out.label).italics());
        if !out.warning.is_empty() {
            ui.label(RichText::new(&out.warning).italics().color(WARNING_COLOR));
        }
        ui.add_space(4.0);

        // Only the top plot carries a legend, so each serial is listed once.
        self.render_figure_panel(ui, "plot_top", &out.figure.top, true);
        ui.add_space(12.0);
        self.render_figure_panel(ui, "plot_bottom", &out.figure.bottom, false);
        self.reset_view = false;
    }
}
