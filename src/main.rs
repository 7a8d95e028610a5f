mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::QuoteDashApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional CSV path on the command line; otherwise use File → Open.
    let csv_path: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Quote Dash – Pricing Dashboard",
        options,
        Box::new(move |_cc| {
            let mut state = AppState::default();
            if let Some(path) = &csv_path {
                state.load_file(path);
            }
            Ok(Box::new(QuoteDashApp::new(state)))
        }),
    )
}
