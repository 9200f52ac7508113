use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: date-range picker and season multi-select.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(4.0);
    ui.heading("Bike Sharing");
    ui.label("Filter the data below:");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Date Range");
            ui.horizontal(|ui: &mut Ui| {
                ui.label("From");
                changed |= ui
                    .add(DatePickerButton::new(&mut state.filters.date_from).id_salt("date_from"))
                    .changed();
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("To");
                changed |= ui
                    .add(DatePickerButton::new(&mut state.filters.date_to).id_salt("date_to"))
                    .changed();
            });
            ui.weak(format!(
                "Data covers {} – {}",
                dataset.date_min, dataset.date_max
            ));
            ui.separator();

            // ---- Season multi-select ----
            let n_selected = state.filters.seasons.len();
            let n_total = dataset.seasons.len();
            let header_text = format!("Season  ({n_selected}/{n_total})");

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("season_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_seasons();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_seasons();
                        }
                    });

                    for season in &dataset.seasons {
                        let mut selected = state.filters.seasons.contains(season);
                        let text = RichText::new(season)
                            .color(state.season_colors.color_for(season));
                        if ui.checkbox(&mut selected, text).changed() {
                            state.toggle_season(season);
                        }
                    }
                    ui.weak("Nothing selected shows all seasons.");
                });

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });

    if changed {
        state.refilter();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Bike Sharing Dataset Analysis");
        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} in range",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.load_error {
            ui.separator();
            ui.label(RichText::new(msg).color(egui::Color32::RED));
        }
    });
}
