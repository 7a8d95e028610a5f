use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// RawQuote – one CSV row before preparation
// ---------------------------------------------------------------------------

/// A quote row exactly as it appears in the source file. The transaction
/// date and customer age stay stringly typed here; coercing them (and
/// bucketing the licence length) is the preparer's job.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuote {
    #[serde(rename = "Quote Number")]
    pub quote_number: i64,
    #[serde(rename = "Transaction Date")]
    pub transaction_date: String,
    #[serde(rename = "Test Group")]
    pub test_group: String,
    #[serde(rename = "Sale Indicator")]
    pub sale_indicator: i64,
    #[serde(rename = "Net Price")]
    pub net_price: f64,
    #[serde(rename = "Profit")]
    pub profit: f64,
    #[serde(rename = "Tax")]
    pub tax: f64,
    #[serde(rename = "Total Price")]
    pub total_price: f64,
    #[serde(rename = "Customer Age")]
    pub customer_age: String,
    #[serde(rename = "Licence Length")]
    pub licence_length: f64,
    #[serde(rename = "Marital Status")]
    pub marital_status: String,
    #[serde(rename = "Credit Score")]
    pub credit_score: f64,
    #[serde(rename = "Vehicle Mileage")]
    pub vehicle_mileage: f64,
    #[serde(rename = "Vehicle Value")]
    pub vehicle_value: f64,
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read all quote rows from a CSV file. Header row required; column names
/// must match the quote schema above.
pub fn load_csv(path: &Path) -> Result<Vec<RawQuote>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<RawQuote>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(row);
    }

    log::info!("Read {} quote rows from {}", rows.len(), path.display());
    Ok(rows)
}
