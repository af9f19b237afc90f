mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Context;
use app::SubscriptionExplorerApp;
use clap::Parser;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::parse();
    // A dataset that cannot be loaded is fatal: the window never opens.
    let table = data::store::init(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;
    let state = AppState::new(table, config.data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Subscription Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(SubscriptionExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
