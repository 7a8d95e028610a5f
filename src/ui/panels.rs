use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::{AggregateFn, Metric};
use crate::data::model::DISPLAY_COLUMNS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} quotes loaded, {} cohorts",
                ds.len(),
                ds.cohorts.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Controls row – metric and aggregation selectors
// ---------------------------------------------------------------------------

/// Render the metric dropdown (seven selectors) and the group-reduction
/// dropdown (first / sum / mean). Any change rebuilds all three charts.
pub fn controls_row(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Metric");
        let current = state.metric;
        egui::ComboBox::from_id_salt("metric_selector")
            .selected_text(current.label())
            .show_ui(ui, |ui: &mut Ui| {
                for metric in Metric::ALL {
                    if ui
                        .selectable_label(current == metric, metric.label())
                        .clicked()
                    {
                        state.set_metric(metric);
                    }
                }
            });

        ui.separator();

        ui.strong("Aggregate");
        let current_fn = state.agg_fn;
        egui::ComboBox::from_id_salt("aggregate_fn")
            .selected_text(current_fn.label())
            .show_ui(ui, |ui: &mut Ui| {
                for agg_fn in AggregateFn::ALL {
                    if ui
                        .selectable_label(current_fn == agg_fn, agg_fn.label())
                        .clicked()
                    {
                        state.set_agg_fn(agg_fn);
                    }
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Data table (bottom panel)
// ---------------------------------------------------------------------------

/// Render the quote table over the display copy, plus the Add Row button.
/// Edits and added rows live in `state.table_rows` only; the charts keep
/// reading the immutable dataset.
pub fn table_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    if ui.button("Add Row").clicked() {
        state.add_table_row();
    }
    ui.add_space(4.0);

    let rows = &mut state.table_rows;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(80.0), DISPLAY_COLUMNS.len())
        .header(20.0, |mut header| {
            for name in DISPLAY_COLUMNS {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let idx = row.index();
                for (col, cell) in rows[idx].cells.iter_mut().enumerate() {
                    row.col(|ui: &mut Ui| {
                        // Quote number and transaction date are identifiers;
                        // everything else is editable in place.
                        if col < 2 {
                            ui.label(cell.as_str());
                        } else {
                            ui.text_edit_singleline(cell);
                        }
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open quote data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_file(&path);
    }
}
