//! Top-level entry point for running the dashboard as a native window.

use eframe::egui;

use crate::config::DashboardConfig;

use super::dashboard_app::DashboardApp;

/// Launch the dashboard in a native window.
///
/// Blocks until the window is closed.
pub fn run_dashboard(mut cfg: DashboardConfig) -> eframe::Result<()> {
    let app = DashboardApp::new(&cfg);

    let title = cfg.title.clone();
    let mut opts = cfg
        .native_options
        .take()
        .unwrap_or_else(eframe::NativeOptions::default);

    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(cfg.window_size[0], cfg.window_size[1]))
            .with_drag_and_drop(true);
    }

    log::info!("starting {title}");
    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}
