//! Configuration for the dashboard window and its defaults.

use std::fs;
use std::path::{Path, PathBuf};

use egui::{Color32, Context, Visuals};
use serde::{Deserialize, Serialize};

use crate::data::metric::Metric;
use crate::figure::PALETTE;

// ─────────────────────────────────────────────────────────────────────────────
// Theme
// ─────────────────────────────────────────────────────────────────────────────

/// Visual theme of the egui context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn label(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn apply(self, ctx: &Context) {
        match self {
            Theme::Dark => ctx.set_visuals(Visuals::dark()),
            Theme::Light => ctx.set_visuals(Visuals::light()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DashboardConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Default split threshold between the two plot panels, in samples.
pub const DEFAULT_SPLIT: i64 = 100;

/// Top-level configuration for the dashboard.
///
/// | Field            | Purpose |
/// |------------------|---------|
/// | `title`          | Window title and heading |
/// | `default_metric` | Metric selected at startup |
/// | `default_split`  | Initial split threshold |
/// | `mirror_path`    | Where each upload's normalized dataset is written |
/// | `palette`        | Serial colors, cycled by selection order |
#[derive(Clone)]
pub struct DashboardConfig {
    /// Native window title, also shown as the heading.
    pub title: String,
    pub default_metric: Metric,
    pub default_split: i64,
    /// Normalized-dataset mirror file. `None` disables mirroring.
    pub mirror_path: Option<PathBuf>,
    pub palette: Vec<Color32>,
    pub theme: Theme,
    /// Initial inner window size in points.
    pub window_size: [f32; 2],
    /// Height of each plot panel in points.
    pub plot_height: f32,
    /// Optional eframe native-window options.
    pub native_options: Option<eframe::NativeOptions>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "ECOv2 Stability Data Analysis".to_string(),
            default_metric: Metric::Raw,
            default_split: DEFAULT_SPLIT,
            mirror_path: Some(PathBuf::from("data.csv")),
            palette: PALETTE.to_vec(),
            theme: Theme::Dark,
            window_size: [1600.0, 1000.0],
            plot_height: 340.0,
            native_options: None,
        }
    }
}

/// The subset of [`DashboardConfig`] that can be set from a YAML file.
///
/// Every field is optional; absent fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub title: Option<String>,
    pub default_metric: Option<Metric>,
    pub default_split: Option<i64>,
    pub mirror_path: Option<PathBuf>,
    pub disable_mirror: bool,
    /// Colors as `#RRGGBB` strings.
    pub palette: Option<Vec<String>>,
    pub theme: Option<Theme>,
    pub window_size: Option<[f32; 2]>,
    pub plot_height: Option<f32>,
}

/// Parse `#RRGGBB` (leading `#` optional).
pub fn parse_hex_color(s: &str) -> Option<Color32> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

impl ConfigFile {
    /// Overlay the fields present in this file onto `cfg`.
    pub fn apply_to(self, cfg: &mut DashboardConfig) {
        if let Some(t) = self.title {
            cfg.title = t;
        }
        if let Some(m) = self.default_metric {
            cfg.default_metric = m;
        }
        if let Some(s) = self.default_split {
            cfg.default_split = s;
        }
        if self.disable_mirror {
            cfg.mirror_path = None;
        } else if let Some(p) = self.mirror_path {
            cfg.mirror_path = Some(p);
        }
        if let Some(colors) = self.palette {
            let parsed: Vec<Color32> = colors.iter().filter_map(|c| parse_hex_color(c)).collect();
            if parsed.len() == colors.len() && !parsed.is_empty() {
                cfg.palette = parsed;
            } else {
                log::warn!("ignoring palette with invalid or no colors");
            }
        }
        if let Some(t) = self.theme {
            cfg.theme = t;
        }
        if let Some(size) = self.window_size {
            cfg.window_size = size;
        }
        if let Some(h) = self.plot_height {
            cfg.plot_height = h;
        }
    }
}

impl DashboardConfig {
    /// Default config file location: `~/.stabilityview/config.yaml`.
    pub fn default_path() -> Result<PathBuf, String> {
        let home = std::env::var("HOME").map_err(|e| format!("HOME env var not set: {}", e))?;
        Ok(PathBuf::from(home).join(".stabilityview").join("config.yaml"))
    }

    /// Defaults overlaid with the YAML file at `path`.
    pub fn load_from_path(path: &Path) -> Result<DashboardConfig, String> {
        let s = fs::read_to_string(path).map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
        let file: ConfigFile =
            serde_yaml::from_str(&s).map_err(|e| format!("Deserialization error: {}", e))?;
        let mut cfg = DashboardConfig::default();
        file.apply_to(&mut cfg);
        Ok(cfg)
    }

    /// Load `~/.stabilityview/config.yaml` if present, defaults otherwise.
    pub fn load_or_default() -> DashboardConfig {
        let path = match Self::default_path() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("{e}; using default configuration");
                return DashboardConfig::default();
            }
        };
        if !path.exists() {
            return DashboardConfig::default();
        }
        match Self::load_from_path(&path) {
            Ok(cfg) => {
                log::info!("loaded configuration from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("{e}; using default configuration");
                DashboardConfig::default()
            }
        }
    }
}
