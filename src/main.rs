mod app;
mod color;
mod state;
mod ui;

use app::SleepDashApp;
use eframe::egui;
use sleep_dash::config::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let config = DashboardConfig::default();
    log::info!("Starting with data source {}", config.source);

    eframe::run_native(
        "Sleep Health and Lifestyle Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SleepDashApp::new(config)))),
    )
}
