//! QuickPlot - CSV loader, chart dispatcher and analysis report viewer
//!
//! Loads a CSV, draws one of six chart kinds in its own window and exports a
//! plain-text analysis report.

mod charts;
mod config;
mod data;
mod gui;
mod report;
mod state;
mod stats;

use config::AppConfig;
use eframe::egui;
use gui::QuickPlotApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = AppConfig::load_or_default();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([420.0, 380.0])
            .with_title("QuickPlot"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "QuickPlot",
        options,
        Box::new(|cc| Ok(Box::new(QuickPlotApp::new(cc, config)))),
    )
}
