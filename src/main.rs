mod app;
mod color;
mod data;
mod state;
mod ui;

use app::BikeDashApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // One-time dataset load; a failure still opens the window so the error
    // is user-visible instead of a silent exit.
    let state = match data::loader::shared_dataset() {
        Ok(dataset) => {
            log::info!(
                "Loaded {} rows covering {} – {}",
                dataset.len(),
                dataset.date_min,
                dataset.date_max
            );
            AppState::with_dataset(dataset.clone())
        }
        Err(e) => {
            log::error!("Failed to load dataset: {e:#}");
            AppState::load_failed(format!("{e:#}"))
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(BikeDashApp::new(state)))),
    )
}
