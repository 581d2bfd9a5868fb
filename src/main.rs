use anyhow::Context as _;

use stabilityview::{run_dashboard, DashboardConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = DashboardConfig::load_or_default();
    if let Some(path) = &cfg.mirror_path {
        log::info!("uploads will be mirrored to {}", path.display());
    }
    run_dashboard(cfg).map_err(|e| anyhow::anyhow!("{e}")).context("dashboard window failed")
}
