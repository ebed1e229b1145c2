mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Result;
use app::InfluencerDashboardApp;
use clap::Parser;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::parse();
    log::debug!("Starting with {config:?}");

    // Load failures are fatal: nothing is shown without a valid table.
    let mut state = match AppState::open(&config.data, config.summary_settings()) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{e:#}");
            return Err(e);
        }
    };
    state.export_dir = config.export_dir();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Influencer Marketing Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(InfluencerDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
