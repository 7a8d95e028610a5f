use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct QuoteDashApp {
    pub state: AppState,
}

impl QuoteDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl Default for QuoteDashApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for QuoteDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Controls: metric + aggregation dropdowns ----
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            panels::controls_row(ui, &mut self.state);
        });

        // ---- Bottom panel: data table with Add Row ----
        egui::TopBottomPanel::bottom("quote_table")
            .default_height(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::table_panel(ui, &mut self.state);
            });

        // ---- Central panel: the three charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_strip(ui, &self.state);
        });
    }
}
