use std::sync::Arc;

use eframe::egui;
use maritime_dashboard::app::DashboardApp;
use maritime_dashboard::color;
use maritime_dashboard::config::DashboardConfig;
use maritime_dashboard::data;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env();
    log::info!(
        "Starting dashboard on port {} with data from {}",
        config.port,
        config.data_path.display()
    );

    // Loaded once; every session shares the same read-only records.
    let (dataset, load_error) = data::loader::load_or_empty(&config.data_path);
    let dataset = Arc::new(dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Maritime Imports Dashboard",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(color::dashboard_visuals());
            Ok(Box::new(DashboardApp::new(dataset, &config, load_error)))
        }),
    )
}
