use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// QuoteRecord – one cleaned row of the dataset
// ---------------------------------------------------------------------------

/// A single insurance quote after preparation: the transaction date is a real
/// calendar date, the customer age is numeric, and the licence length has
/// been rounded up into a whole-unit bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    pub quote_number: i64,
    pub transaction_date: NaiveDate,
    pub test_group: String,
    pub sale_indicator: i64,
    pub net_price: f64,
    pub profit: f64,
    pub tax: f64,
    pub total_price: f64,
    pub customer_age: f64,
    /// Ceiling of the raw tenure, so fractional values collapse into
    /// discrete display buckets.
    pub licence_length: f64,
    pub marital_status: String,
    pub credit_score: f64,
    pub vehicle_mileage: f64,
    pub vehicle_value: f64,
}

// ---------------------------------------------------------------------------
// QuoteDataset – the immutable working table
// ---------------------------------------------------------------------------

/// The cleaned dataset, loaded once and held immutable for the process
/// lifetime. Aggregation always reads from here; the editable table shown in
/// the UI is a display-only copy that never feeds back.
#[derive(Debug, Clone)]
pub struct QuoteDataset {
    /// All quotes in original file order.
    pub quotes: Vec<QuoteRecord>,
    /// Sorted unique cohort labels (test groups), for colouring and legends.
    pub cohorts: Vec<String>,
}

impl QuoteDataset {
    /// Build the cohort index from the cleaned quotes.
    pub fn from_quotes(quotes: Vec<QuoteRecord>) -> Self {
        let mut cohorts: Vec<String> = quotes.iter().map(|q| q.test_group.clone()).collect();
        cohorts.sort();
        cohorts.dedup();
        QuoteDataset { quotes, cohorts }
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// The fixed-column projection backing the data table.
    pub fn display_rows(&self) -> Vec<DisplayRow> {
        self.quotes.iter().map(DisplayRow::from_quote).collect()
    }
}

// ---------------------------------------------------------------------------
// DisplayRow – the table projection
// ---------------------------------------------------------------------------

/// Column headers of the table projection, in display order.
pub const DISPLAY_COLUMNS: [&str; 11] = [
    "Quote Number",
    "Transaction Date",
    "Test Group",
    "Net Price",
    "Profit",
    "Customer Age",
    "Vehicle Mileage",
    "Vehicle Value",
    "Credit Score",
    "Marital Status",
    "Tax",
];

/// One row of the data table: plain text cells so rows added via the UI can
/// start empty without pretending to be numbers.
#[derive(Debug, Clone)]
pub struct DisplayRow {
    pub cells: [String; 11],
}

impl DisplayRow {
    fn from_quote(q: &QuoteRecord) -> Self {
        DisplayRow {
            cells: [
                q.quote_number.to_string(),
                q.transaction_date.to_string(),
                q.test_group.clone(),
                format!("{:.2}", q.net_price),
                format!("{:.2}", q.profit),
                format!("{}", q.customer_age),
                format!("{}", q.vehicle_mileage),
                format!("{}", q.vehicle_value),
                format!("{}", q.credit_score),
                q.marital_status.clone(),
                format!("{:.2}", q.tax),
            ],
        }
    }

    /// A fresh all-empty row, as appended by the Add Row button.
    pub fn empty() -> Self {
        DisplayRow {
            cells: Default::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// GroupKey – an orderable grouping key
// ---------------------------------------------------------------------------

/// The key a group of quotes is collected under: either a numeric column
/// value or a calendar date (daily / weekly buckets).
/// Kept in `BTreeMap`s downstream so `GroupKey` must be `Ord`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupKey {
    Number(f64),
    Date(NaiveDate),
}

// -- Manual Eq/Ord so f64 keys can live in a BTreeMap --

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use GroupKey::*;
        match (self, other) {
            (Number(a), Number(b)) => a.total_cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (Number(_), Date(_)) => std::cmp::Ordering::Less,
            (Date(_), Number(_)) => std::cmp::Ordering::Greater,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Number(v) => write!(f, "{v}"),
            GroupKey::Date(d) => write!(f, "{d}"),
        }
    }
}

impl GroupKey {
    /// Plot-axis coordinate: the number itself, or days since the Unix epoch
    /// for dates.
    pub fn plot_x(&self) -> f64 {
        match self {
            GroupKey::Number(v) => *v,
            GroupKey::Date(d) => {
                let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
                (*d - epoch).num_days() as f64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn group_keys_order_ascending() {
        let mut keys = vec![
            GroupKey::Number(3.0),
            GroupKey::Number(1.0),
            GroupKey::Date(d(2021, 1, 2)),
            GroupKey::Date(d(2021, 1, 1)),
            GroupKey::Number(2.0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                GroupKey::Number(1.0),
                GroupKey::Number(2.0),
                GroupKey::Number(3.0),
                GroupKey::Date(d(2021, 1, 1)),
                GroupKey::Date(d(2021, 1, 2)),
            ]
        );
    }

    #[test]
    fn date_keys_map_to_days_since_epoch() {
        assert_eq!(GroupKey::Date(d(1970, 1, 2)).plot_x(), 1.0);
        assert_eq!(GroupKey::Number(42.5).plot_x(), 42.5);
    }

    #[test]
    fn cohort_index_is_sorted_and_unique() {
        let quotes = vec![
            quote_with_group("B"),
            quote_with_group("A"),
            quote_with_group("B"),
        ];
        let ds = QuoteDataset::from_quotes(quotes);
        assert_eq!(ds.cohorts, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.display_rows().len(), 3);
    }

    fn quote_with_group(group: &str) -> QuoteRecord {
        QuoteRecord {
            quote_number: 1,
            transaction_date: d(2021, 1, 1),
            test_group: group.to_string(),
            sale_indicator: 0,
            net_price: 0.0,
            profit: 0.0,
            tax: 0.0,
            total_price: 0.0,
            customer_age: 30.0,
            licence_length: 1.0,
            marital_status: "Single".to_string(),
            credit_score: 500.0,
            vehicle_mileage: 10_000.0,
            vehicle_value: 5_000.0,
        }
    }
}
