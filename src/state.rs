use std::path::Path;

use anyhow::{Context, Result};

use crate::color::CohortColors;
use crate::data::aggregate::{aggregate, AggregateFn, AggregatedSeries, Metric, ValueColumn};
use crate::data::loader::load_csv;
use crate::data::model::{DisplayRow, QuoteDataset};
use crate::data::prepare::prepare;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Cleaned dataset (None until a file is loaded). Immutable once set;
    /// aggregation always reads from here.
    pub dataset: Option<QuoteDataset>,

    /// Currently selected grouping dimension.
    pub metric: Metric,

    /// How each group is reduced to one value (first / sum / mean).
    pub agg_fn: AggregateFn,

    /// Cached chart series, one per value column, rebuilt on selection
    /// change. Left untouched when an aggregation fails.
    pub charts: Vec<AggregatedSeries>,

    /// Cohort label → colour, shared by all three charts.
    pub cohort_colors: CohortColors,

    /// Display-only copy of the table. Rows added via the UI live here and
    /// never feed back into `dataset`.
    pub table_rows: Vec<DisplayRow>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            metric: Metric::CustomerAge,
            agg_fn: AggregateFn::First,
            charts: Vec::new(),
            cohort_colors: CohortColors::default(),
            table_rows: Vec::new(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Load, prepare, and ingest a quote CSV. On failure the previous
    /// dataset and charts stay as they were.
    pub fn load_file(&mut self, path: &Path) {
        match read_dataset(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} quotes across cohorts {:?}",
                    dataset.len(),
                    dataset.cohorts
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly prepared dataset: rebuild colours, the display table,
    /// and all three chart series.
    pub fn set_dataset(&mut self, dataset: QuoteDataset) {
        self.cohort_colors = CohortColors::new(&dataset.cohorts);
        self.table_rows = dataset.display_rows();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    /// Switch the grouping dimension and rebuild the charts.
    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
        self.recompute();
    }

    /// Switch the group-reduction function and rebuild the charts.
    pub fn set_agg_fn(&mut self, agg_fn: AggregateFn) {
        self.agg_fn = agg_fn;
        self.recompute();
    }

    /// Run the three aggregations (profit, net price, total price) against
    /// the immutable dataset. The calls are independent pure functions; on
    /// any failure the prior chart state is left unchanged.
    pub fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };

        let mut charts = Vec::with_capacity(ValueColumn::ALL.len());
        for column in ValueColumn::ALL {
            match aggregate(dataset, self.metric, column, self.agg_fn) {
                Ok(series) => charts.push(series),
                Err(e) => {
                    log::error!("Aggregation failed for {}: {e}", column.label());
                    self.status_message = Some(format!("Error: {e}"));
                    return;
                }
            }
        }
        self.charts = charts;
        self.status_message = None;
    }

    /// Append an all-empty row to the display table (the Add Row button).
    /// Display-only: charts never see these rows.
    pub fn add_table_row(&mut self) {
        self.table_rows.push(DisplayRow::empty());
    }
}

fn read_dataset(path: &Path) -> Result<QuoteDataset> {
    let rows = load_csv(path)?;
    let dataset = prepare(rows).context("preparing dataset")?;
    Ok(dataset)
}
