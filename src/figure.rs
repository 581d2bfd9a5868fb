//! Split-range figure construction.
//!
//! [`build_figure`] turns the latest-run dataset into a two-panel [`Figure`]:
//! samples up to the split threshold in the top panel, the rest in the bottom
//! one. Each selected serial gets its raw series plus mean and ±σ reference
//! lines. The result is plain data; `panels::plot_ui` draws it with egui_plot.

use egui::Color32;

use crate::data::metric::Metric;
use crate::data::record::{Dataset, SampleRecord};
use crate::data::stats::Moments;

/// Plotly's qualitative palette; serial colors cycle through it.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(0x63, 0x6E, 0xFA),
    Color32::from_rgb(0xEF, 0x55, 0x3B),
    Color32::from_rgb(0x00, 0xCC, 0x96),
    Color32::from_rgb(0xAB, 0x63, 0xFA),
    Color32::from_rgb(0xFF, 0xA1, 0x5A),
    Color32::from_rgb(0x19, 0xD3, 0xF3),
    Color32::from_rgb(0xFF, 0x66, 0x92),
    Color32::from_rgb(0xB6, 0xE8, 0x80),
    Color32::from_rgb(0xFF, 0x97, 0xFF),
    Color32::from_rgb(0xFE, 0xCB, 0x52),
];

pub const LABEL_ALL: &str = "All serials (latest run)";
pub const LABEL_NO_VALID: &str = "No valid serials selected";

/// Color for the serial at `index` in the selected-serial list.
pub fn serial_color(palette: &[Color32], index: usize) -> Color32 {
    if palette.is_empty() {
        return Color32::GRAY;
    }
    palette[index % palette.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Series,
    Mean,
    SigmaUpper,
    SigmaLower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dash {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigureTrace {
    pub name: String,
    pub serial: String,
    pub kind: TraceKind,
    pub color: Color32,
    pub dash: Dash,
    pub width: f32,
    pub points: Vec<[f64; 2]>,
    pub show_legend: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FigurePanel {
    pub title: String,
    pub traces: Vec<FigureTrace>,
}

impl FigurePanel {
    /// Serials with at least one trace in this panel, in drawing order.
    pub fn serials(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for t in &self.traces {
            if !out.contains(&t.serial.as_str()) {
                out.push(&t.serial);
            }
        }
        out
    }

    pub fn traces_of<'a>(
        &'a self,
        serial: &'a str,
    ) -> impl Iterator<Item = &'a FigureTrace> + 'a {
        self.traces.iter().filter(move |t| t.serial == serial)
    }
}

/// Two vertically stacked panels: x ≤ split on top, x > split below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Figure {
    pub top: FigurePanel,
    pub bottom: FigurePanel,
}

impl Figure {
    pub fn is_empty(&self) -> bool {
        self.top.traces.is_empty() && self.bottom.traces.is_empty()
    }

    pub fn panels(&self) -> [&FigurePanel; 2] {
        [&self.top, &self.bottom]
    }
}

/// Which serials a render compares, after checking a requested subset against
/// the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSelection {
    pub serials: Vec<String>,
    pub missing: Vec<String>,
    pub label: String,
}

impl SerialSelection {
    /// Warning listing requested serials that have no data; empty if none.
    pub fn warning(&self) -> String {
        if self.missing.is_empty() {
            String::new()
        } else {
            format!("⚠️ No data for: {}", self.missing.join(", "))
        }
    }
}

/// Resolve the comparison subset. An empty request means every serial.
pub fn select_serials(dataset: &Dataset, requested: &[String]) -> SerialSelection {
    let all = dataset.serials();
    if requested.is_empty() {
        return SerialSelection {
            serials: all,
            missing: Vec::new(),
            label: LABEL_ALL.to_string(),
        };
    }

    let mut serials: Vec<String> = Vec::new();
    let mut missing: Vec<String> = Vec::new();
    for s in requested {
        let bucket = if all.binary_search(s).is_ok() {
            &mut serials
        } else {
            &mut missing
        };
        if !bucket.contains(s) {
            bucket.push(s.clone());
        }
    }
    let label = if serials.is_empty() {
        LABEL_NO_VALID.to_string()
    } else {
        format!("Comparing {} serial(s)", serials.len())
    };
    SerialSelection {
        serials,
        missing,
        label,
    }
}

/// Everything a plot render produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotOutput {
    pub figure: Figure,
    pub label: String,
    pub warning: String,
}

/// Build the split-range figure for `metric` from a latest-run dataset.
pub fn build_figure(
    dataset: &Dataset,
    metric: Metric,
    requested: &[String],
    split: i64,
    palette: &[Color32],
) -> PlotOutput {
    let selection = select_serials(dataset, requested);
    let warning = selection.warning();
    if selection.serials.is_empty() {
        return PlotOutput {
            figure: Figure::default(),
            label: selection.label,
            warning,
        };
    }

    let threshold = split as f64;
    let mut top = FigurePanel {
        title: format!("{metric} 1–{split}"),
        traces: Vec::new(),
    };
    let mut bottom = FigurePanel {
        title: format!("{metric} {}+", split.saturating_add(1)),
        traces: Vec::new(),
    };

    for (idx, serial) in selection.serials.iter().enumerate() {
        let color = serial_color(palette, idx);
        let rows = dataset.records.iter().filter(|r| &r.serial == serial);
        let (upper, lower): (Vec<&SampleRecord>, Vec<&SampleRecord>) = rows
            .filter(|r| r.x.is_some())
            .partition(|r| r.x.is_some_and(|x| x <= threshold));
        push_serial_traces(&mut top, serial, color, metric, &upper, true);
        push_serial_traces(&mut bottom, serial, color, metric, &lower, false);
    }

    log::debug!(
        "built figure for {metric}: {} top / {} bottom traces",
        top.traces.len(),
        bottom.traces.len()
    );

    PlotOutput {
        figure: Figure { top, bottom },
        label: selection.label,
        warning,
    }
}

fn push_serial_traces(
    panel: &mut FigurePanel,
    serial: &str,
    color: Color32,
    metric: Metric,
    rows: &[&SampleRecord],
    legend: bool,
) {
    if rows.is_empty() {
        return;
    }

    let points: Vec<[f64; 2]> = rows
        .iter()
        .filter_map(|r| Some([r.x?, r.metric(metric)?]))
        .collect();
    let moments = Moments::from_values(points.iter().map(|p| p[1]));

    panel.traces.push(FigureTrace {
        name: serial.to_string(),
        serial: serial.to_string(),
        kind: TraceKind::Series,
        color,
        dash: Dash::Solid,
        width: 1.5,
        points,
        show_legend: legend,
    });

    let Some(m) = moments else {
        return;
    };
    let (x0, x1) = rows
        .iter()
        .filter_map(|r| r.x)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    let hline = |y: f64| vec![[x0, y], [x1, y]];

    panel.traces.push(FigureTrace {
        name: format!("{serial} (mean)"),
        serial: serial.to_string(),
        kind: TraceKind::Mean,
        color,
        dash: Dash::Dashed,
        width: 2.0,
        points: hline(m.mean),
        show_legend: legend,
    });

    if let Some(sd) = m.std_dev {
        for (kind, y) in [
            (TraceKind::SigmaUpper, m.mean + sd),
            (TraceKind::SigmaLower, m.mean - sd),
        ] {
            panel.traces.push(FigureTrace {
                name: format!("{serial} (±σ)"),
                serial: serial.to_string(),
                kind,
                color,
                dash: Dash::Dotted,
                width: 1.0,
                points: hline(y),
                show_legend: false,
            });
        }
    }
}
