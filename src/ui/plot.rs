use eframe::egui::Ui;
use egui_plot::{Line, Plot, PlotPoints, Points};

use crate::data::aggregate::{AggregatedSeries, ChartKind};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart strip (central panel): profit, net price, total price
// ---------------------------------------------------------------------------

/// Render the three aggregate charts side by side.
pub fn chart_strip(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a quote CSV to view charts  (File → Open…)");
        });
        return;
    }

    let n = state.charts.len();
    ui.columns(n.max(1), |columns| {
        for (col, series) in columns.iter_mut().zip(&state.charts) {
            chart(col, series, state);
        }
    });
}

/// One chart: the aggregated series split into per-cohort sub-series so each
/// test group gets its own colour and legend entry.
fn chart(ui: &mut Ui, series: &AggregatedSeries, state: &AppState) {
    ui.vertical(|ui: &mut Ui| {
        ui.strong(series.value_column.label());

        Plot::new(format!("chart_{}", series.value_column.label()))
            .legend(egui_plot::Legend::default())
            .x_axis_label(series.metric.label())
            .y_axis_label(series.value_column.label())
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .show(ui, |plot_ui| {
                let cohorts = state
                    .dataset
                    .as_ref()
                    .map(|ds| ds.cohorts.clone())
                    .unwrap_or_default();

                for cohort in &cohorts {
                    let points: PlotPoints = series
                        .points
                        .iter()
                        .filter(|p| &p.cohort == cohort)
                        .map(|p| [p.key.plot_x(), p.value])
                        .collect();

                    let color = state.cohort_colors.color_for(cohort);

                    match series.chart {
                        ChartKind::Line => {
                            let line = Line::new(points)
                                .name(cohort)
                                .color(color)
                                .width(1.5);
                            plot_ui.line(line);
                        }
                        ChartKind::Scatter => {
                            let dots = Points::new(points)
                                .name(cohort)
                                .color(color)
                                .radius(2.5);
                            plot_ui.points(dots);
                        }
                    }
                }
            });
    });
}
