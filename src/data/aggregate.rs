use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

use super::model::{GroupKey, QuoteDataset, QuoteRecord};

// ---------------------------------------------------------------------------
// Selector, value column, aggregation function
// ---------------------------------------------------------------------------

/// The user-facing grouping dimension. `ByDay` and `ByWeek` group on the
/// transaction date (the weekly mode additionally sums per cohort per
/// calendar week); everything else groups on the raw column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    CustomerAge,
    VehicleValue,
    VehicleMileage,
    ByDay,
    ByWeek,
    LicenceLength,
    CreditScore,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::CustomerAge,
        Metric::VehicleValue,
        Metric::VehicleMileage,
        Metric::ByDay,
        Metric::ByWeek,
        Metric::LicenceLength,
        Metric::CreditScore,
    ];

    /// The verbatim selector identifier passed in from the UI layer.
    pub fn selector(&self) -> &'static str {
        match self {
            Metric::CustomerAge => "Customer Age",
            Metric::VehicleValue => "Vehicle Value",
            Metric::VehicleMileage => "Vehicle Mileage",
            Metric::ByDay => "Transaction Date",
            Metric::ByWeek => "By Week",
            Metric::LicenceLength => "Licence Length",
            Metric::CreditScore => "Credit Score",
        }
    }

    /// Dropdown label; the daily selector reads "By Day" in the UI even
    /// though its identifier is the date column name.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::ByDay => "By Day",
            other => other.selector(),
        }
    }

    /// Time selectors render as discrete points; everything else as a
    /// connected line over the ordered group keys.
    pub fn chart_kind(&self) -> ChartKind {
        match self {
            Metric::ByDay | Metric::ByWeek => ChartKind::Scatter,
            _ => ChartKind::Line,
        }
    }
}

impl FromStr for Metric {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .find(|m| m.selector() == s)
            .copied()
            .ok_or_else(|| AggregateError::UnknownMetric(s.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The numeric column being summarized per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumn {
    Profit,
    NetPrice,
    TotalPrice,
}

impl ValueColumn {
    pub const ALL: [ValueColumn; 3] =
        [ValueColumn::Profit, ValueColumn::NetPrice, ValueColumn::TotalPrice];

    pub fn label(&self) -> &'static str {
        match self {
            ValueColumn::Profit => "Profit",
            ValueColumn::NetPrice => "Net Price",
            ValueColumn::TotalPrice => "Total Price",
        }
    }

    fn of(&self, q: &QuoteRecord) -> f64 {
        match self {
            ValueColumn::Profit => q.profit,
            ValueColumn::NetPrice => q.net_price,
            ValueColumn::TotalPrice => q.total_price,
        }
    }
}

/// How the representative value of a group is chosen. `First` matches the
/// dashboard's historical behaviour (the first row of each group wins);
/// `Sum` and `Mean` are the obvious alternatives, selectable in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregateFn {
    #[default]
    First,
    Sum,
    Mean,
}

impl AggregateFn {
    pub const ALL: [AggregateFn; 3] = [AggregateFn::First, AggregateFn::Sum, AggregateFn::Mean];

    pub fn label(&self) -> &'static str {
        match self {
            AggregateFn::First => "first",
            AggregateFn::Sum => "sum",
            AggregateFn::Mean => "mean",
        }
    }

    fn apply(&self, values: &[f64]) -> f64 {
        match self {
            AggregateFn::First => values.first().copied().unwrap_or_default(),
            AggregateFn::Sum => values.iter().sum(),
            AggregateFn::Mean => {
                if values.is_empty() {
                    0.0
                } else {
                    values.iter().sum::<f64>() / values.len() as f64
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregated series
// ---------------------------------------------------------------------------

/// Whether the series should be drawn as a connected line or as discrete
/// scatter points. A formatting tag, not a data-shape difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Scatter,
}

/// One chart point: the group key, the cohort label that represents the
/// group, and the summarized value.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub key: GroupKey,
    pub cohort: String,
    pub value: f64,
}

/// The chart-ready output of `aggregate`: one point per distinct group key,
/// keys ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    pub metric: Metric,
    pub value_column: ValueColumn,
    pub chart: ChartKind,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("unknown metric selector '{0}'")]
    UnknownMetric(String),
    #[error("dataset has no rows to group")]
    EmptyDataset,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// The calendar week a date belongs to, labelled by its ending Sunday.
/// Sundays map to themselves.
pub fn week_ending_sunday(date: NaiveDate) -> NaiveDate {
    let days_left = (7 - date.weekday().num_days_from_sunday() as i64) % 7;
    date + Duration::days(days_left)
}

/// Group the dataset by the chosen metric and summarize `value_column` in
/// each group. Pure function of its inputs: no I/O, no hidden state.
pub fn aggregate(
    dataset: &QuoteDataset,
    metric: Metric,
    value_column: ValueColumn,
    agg_fn: AggregateFn,
) -> Result<AggregatedSeries, AggregateError> {
    if dataset.is_empty() {
        return Err(AggregateError::EmptyDataset);
    }

    let points = match metric {
        Metric::ByDay => {
            // Sort by date first so "first row per day" is well defined;
            // stable sort keeps file order within a day.
            let mut rows: Vec<&QuoteRecord> = dataset.quotes.iter().collect();
            rows.sort_by_key(|q| q.transaction_date);
            group_rows(rows, value_column, agg_fn, |q| {
                GroupKey::Date(q.transaction_date)
            })
        }
        Metric::ByWeek => aggregate_weekly(dataset, value_column, agg_fn),
        Metric::LicenceLength => group_in_file_order(dataset, value_column, agg_fn, |q| {
            GroupKey::Number(q.licence_length)
        }),
        Metric::CustomerAge => group_in_file_order(dataset, value_column, agg_fn, |q| {
            GroupKey::Number(q.customer_age)
        }),
        Metric::VehicleValue => group_in_file_order(dataset, value_column, agg_fn, |q| {
            GroupKey::Number(q.vehicle_value)
        }),
        Metric::VehicleMileage => group_in_file_order(dataset, value_column, agg_fn, |q| {
            GroupKey::Number(q.vehicle_mileage)
        }),
        Metric::CreditScore => group_in_file_order(dataset, value_column, agg_fn, |q| {
            GroupKey::Number(q.credit_score)
        }),
    };

    Ok(AggregatedSeries {
        metric,
        value_column,
        chart: metric.chart_kind(),
        points,
    })
}

fn group_in_file_order(
    dataset: &QuoteDataset,
    value_column: ValueColumn,
    agg_fn: AggregateFn,
    key_of: impl Fn(&QuoteRecord) -> GroupKey,
) -> Vec<SeriesPoint> {
    group_rows(dataset.quotes.iter().collect(), value_column, agg_fn, key_of)
}

/// Collect rows into key-ordered groups (encounter order preserved within a
/// group) and reduce each group to one point. The cohort label comes from
/// the group's first row.
fn group_rows(
    rows: Vec<&QuoteRecord>,
    value_column: ValueColumn,
    agg_fn: AggregateFn,
    key_of: impl Fn(&QuoteRecord) -> GroupKey,
) -> Vec<SeriesPoint> {
    let mut groups: BTreeMap<GroupKey, Vec<&QuoteRecord>> = BTreeMap::new();
    for q in rows {
        groups.entry(key_of(q)).or_default().push(q);
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let values: Vec<f64> = members.iter().map(|q| value_column.of(q)).collect();
            SeriesPoint {
                key,
                cohort: members[0].test_group.clone(),
                value: agg_fn.apply(&values),
            }
        })
        .collect()
}

/// Weekly mode: sum `value_column` per (cohort, week ending Sunday), then
/// reduce the per-cohort sums within each week to one point. With the
/// default `First` function the point is the first summed row per week,
/// i.e. the lexicographically smallest cohort wins.
fn aggregate_weekly(
    dataset: &QuoteDataset,
    value_column: ValueColumn,
    agg_fn: AggregateFn,
) -> Vec<SeriesPoint> {
    let mut sums: BTreeMap<(NaiveDate, &str), f64> = BTreeMap::new();
    for q in &dataset.quotes {
        let week = week_ending_sunday(q.transaction_date);
        *sums.entry((week, q.test_group.as_str())).or_default() += value_column.of(q);
    }

    // Regroup the (week, cohort) sums by week; BTreeMap iteration already
    // orders by week then cohort.
    let mut weeks: BTreeMap<NaiveDate, Vec<(&str, f64)>> = BTreeMap::new();
    for ((week, cohort), sum) in sums {
        weeks.entry(week).or_default().push((cohort, sum));
    }

    weeks
        .into_iter()
        .map(|(week, cohort_sums)| {
            let values: Vec<f64> = cohort_sums.iter().map(|(_, v)| *v).collect();
            SeriesPoint {
                key: GroupKey::Date(week),
                cohort: cohort_sums[0].0.to_string(),
                value: agg_fn.apply(&values),
            }
        })
        .collect()
}

/// Convenience for the UI layer: resolve a selector string, then aggregate.
pub fn aggregate_by_selector(
    dataset: &QuoteDataset,
    selector: &str,
    value_column: ValueColumn,
    agg_fn: AggregateFn,
) -> Result<AggregatedSeries, AggregateError> {
    let metric = selector.parse::<Metric>()?;
    aggregate(dataset, metric, value_column, agg_fn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::QuoteDataset;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn quote(date: NaiveDate, group: &str, profit: f64) -> QuoteRecord {
        QuoteRecord {
            quote_number: 0,
            transaction_date: date,
            test_group: group.to_string(),
            sale_indicator: 1,
            net_price: profit * 2.0,
            profit,
            tax: 1.0,
            total_price: profit * 3.0,
            customer_age: 30.0,
            licence_length: 1.0,
            marital_status: "Single".to_string(),
            credit_score: 500.0,
            vehicle_mileage: 10_000.0,
            vehicle_value: 5_000.0,
        }
    }

    #[test]
    fn daily_series_is_date_ascending_first_value() {
        let ds = QuoteDataset::from_quotes(vec![
            quote(d(2021, 1, 3), "A", 30.0),
            quote(d(2021, 1, 1), "A", 10.0),
            quote(d(2021, 1, 2), "A", 20.0),
        ]);
        let series =
            aggregate(&ds, Metric::ByDay, ValueColumn::Profit, AggregateFn::First).unwrap();
        let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
        assert_eq!(series.chart, ChartKind::Scatter);
    }

    #[test]
    fn daily_first_takes_earliest_file_row_within_a_day() {
        let ds = QuoteDataset::from_quotes(vec![
            quote(d(2021, 1, 1), "B", 5.0),
            quote(d(2021, 1, 1), "A", 9.0),
        ]);
        let series =
            aggregate(&ds, Metric::ByDay, ValueColumn::Profit, AggregateFn::First).unwrap();
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].cohort, "B");
        assert_eq!(series.points[0].value, 5.0);
    }

    #[test]
    fn weekly_sums_within_cohort_and_week() {
        // 2021-01-05 (Tue) and 2021-01-07 (Thu) both fall in the week
        // ending Sunday 2021-01-10.
        let ds = QuoteDataset::from_quotes(vec![
            quote(d(2021, 1, 5), "A", 5.0),
            quote(d(2021, 1, 7), "A", 7.0),
        ]);
        let series =
            aggregate(&ds, Metric::ByWeek, ValueColumn::Profit, AggregateFn::First).unwrap();
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].key, GroupKey::Date(d(2021, 1, 10)));
        assert_eq!(series.points[0].value, 12.0);
        assert_eq!(series.chart, ChartKind::Scatter);
    }

    #[test]
    fn weekly_first_picks_smallest_cohort_label() {
        let ds = QuoteDataset::from_quotes(vec![
            quote(d(2021, 1, 5), "B", 100.0),
            quote(d(2021, 1, 6), "A", 1.0),
        ]);
        let series =
            aggregate(&ds, Metric::ByWeek, ValueColumn::Profit, AggregateFn::First).unwrap();
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].cohort, "A");
        assert_eq!(series.points[0].value, 1.0);
    }

    #[test]
    fn weekly_sum_collapses_cohorts() {
        let ds = QuoteDataset::from_quotes(vec![
            quote(d(2021, 1, 5), "B", 100.0),
            quote(d(2021, 1, 6), "A", 1.0),
        ]);
        let series =
            aggregate(&ds, Metric::ByWeek, ValueColumn::Profit, AggregateFn::Sum).unwrap();
        assert_eq!(series.points[0].value, 101.0);
    }

    #[test]
    fn licence_length_groups_by_ceiled_bucket() {
        let mut a = quote(d(2021, 1, 1), "A", 10.0);
        a.licence_length = 2.3_f64.ceil();
        let mut b = quote(d(2021, 1, 2), "A", 20.0);
        b.licence_length = 3.0;
        let ds = QuoteDataset::from_quotes(vec![a, b]);
        let series = aggregate(
            &ds,
            Metric::LicenceLength,
            ValueColumn::Profit,
            AggregateFn::First,
        )
        .unwrap();
        // Both rows land in bucket 3 and the first one wins.
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].key, GroupKey::Number(3.0));
        assert_eq!(series.points[0].value, 10.0);
        assert_eq!(series.chart, ChartKind::Line);
    }

    #[test]
    fn point_count_equals_distinct_group_keys() {
        let mut quotes = Vec::new();
        for (i, age) in [20.0, 20.0, 35.0, 35.0, 50.0].iter().enumerate() {
            let mut q = quote(d(2021, 1, 1 + i as u32), "A", i as f64);
            q.customer_age = *age;
            q.credit_score = 400.0 + i as f64;
            quotes.push(q);
        }
        let ds = QuoteDataset::from_quotes(quotes);

        let ages =
            aggregate(&ds, Metric::CustomerAge, ValueColumn::Profit, AggregateFn::First).unwrap();
        assert_eq!(ages.points.len(), 3);

        let scores =
            aggregate(&ds, Metric::CreditScore, ValueColumn::Profit, AggregateFn::First).unwrap();
        assert_eq!(scores.points.len(), 5);

        let days = aggregate(&ds, Metric::ByDay, ValueColumn::Profit, AggregateFn::First).unwrap();
        assert_eq!(days.points.len(), 5);
    }

    #[test]
    fn aggregate_is_idempotent() {
        let ds = QuoteDataset::from_quotes(vec![
            quote(d(2021, 1, 5), "A", 5.0),
            quote(d(2021, 1, 7), "B", 7.0),
        ]);
        for metric in Metric::ALL {
            let a = aggregate(&ds, metric, ValueColumn::NetPrice, AggregateFn::First).unwrap();
            let b = aggregate(&ds, metric, ValueColumn::NetPrice, AggregateFn::First).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn empty_dataset_fails_for_every_selector() {
        let ds = QuoteDataset::from_quotes(Vec::new());
        for metric in Metric::ALL {
            let err =
                aggregate(&ds, metric, ValueColumn::Profit, AggregateFn::First).unwrap_err();
            assert_eq!(err, AggregateError::EmptyDataset);
        }
    }

    #[test]
    fn unknown_selector_is_rejected() {
        let err = "Shoe Size".parse::<Metric>().unwrap_err();
        assert_eq!(err, AggregateError::UnknownMetric("Shoe Size".to_string()));
    }

    #[test]
    fn selector_strings_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.selector().parse::<Metric>().unwrap(), metric);
        }
        // The daily selector identifier is the date column name.
        assert_eq!("Transaction Date".parse::<Metric>().unwrap(), Metric::ByDay);
    }

    #[test]
    fn sum_and_mean_change_the_group_value() {
        let mut a = quote(d(2021, 1, 1), "A", 10.0);
        a.customer_age = 40.0;
        let mut b = quote(d(2021, 1, 2), "A", 30.0);
        b.customer_age = 40.0;
        let ds = QuoteDataset::from_quotes(vec![a, b]);

        let first =
            aggregate(&ds, Metric::CustomerAge, ValueColumn::Profit, AggregateFn::First).unwrap();
        assert_eq!(first.points[0].value, 10.0);

        let sum =
            aggregate(&ds, Metric::CustomerAge, ValueColumn::Profit, AggregateFn::Sum).unwrap();
        assert_eq!(sum.points[0].value, 40.0);

        let mean =
            aggregate(&ds, Metric::CustomerAge, ValueColumn::Profit, AggregateFn::Mean).unwrap();
        assert_eq!(mean.points[0].value, 20.0);
    }

    #[test]
    fn weeks_end_on_sunday() {
        // 2021-01-03 is a Sunday.
        assert_eq!(week_ending_sunday(d(2021, 1, 3)), d(2021, 1, 3));
        assert_eq!(week_ending_sunday(d(2021, 1, 4)), d(2021, 1, 10)); // Monday
        assert_eq!(week_ending_sunday(d(2021, 1, 9)), d(2021, 1, 10)); // Saturday
    }

    #[test]
    fn selector_dispatch_matches_direct_call() {
        let ds = QuoteDataset::from_quotes(vec![quote(d(2021, 1, 5), "A", 5.0)]);
        let via_str =
            aggregate_by_selector(&ds, "By Week", ValueColumn::Profit, AggregateFn::First)
                .unwrap();
        let direct =
            aggregate(&ds, Metric::ByWeek, ValueColumn::Profit, AggregateFn::First).unwrap();
        assert_eq!(via_str, direct);
    }
}
