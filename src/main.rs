mod app;
mod color;
mod state;
mod ui;

use app::RecoveryPanelApp;
use eframe::egui;
use recovery_panel::config::PanelConfig;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = PanelConfig::default_path();
    let config = PanelConfig::from_file(&config_path).unwrap_or_else(|e| {
        log::error!("Invalid config, using defaults: {e:#}");
        PanelConfig::default()
    });
    log::info!(
        "Source {}, cache {}",
        config.source_path.display(),
        config.cache_path.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Recovery Panel – Judicial Intelligence",
        options,
        Box::new(|_cc| Ok(Box::new(RecoveryPanelApp::new(config)))),
    )
}
