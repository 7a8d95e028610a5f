use chrono::NaiveDate;
use thiserror::Error;

use super::loader::RawQuote;
use super::model::{QuoteDataset, QuoteRecord};

// ---------------------------------------------------------------------------
// Dataset preparation: raw CSV rows → cleaned working table
// ---------------------------------------------------------------------------

/// A cell that could not be coerced during preparation. Fatal to the whole
/// load: no dataset is produced on failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrepareError {
    #[error("row {row}: {column} value '{value}' is not a {expected}")]
    Format {
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Date formats accepted for the transaction-date column.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Clean the raw rows into the immutable working table:
/// 1. parse the transaction date into a real calendar date,
/// 2. coerce the customer age to numeric,
/// 3. replace the licence length with its ceiling (whole-unit buckets).
///
/// All original columns are preserved; the raw rows are not mutated.
pub fn prepare(rows: Vec<RawQuote>) -> Result<QuoteDataset, PrepareError> {
    let mut quotes = Vec::with_capacity(rows.len());

    for (row_no, raw) in rows.into_iter().enumerate() {
        let transaction_date =
            parse_date(&raw.transaction_date).ok_or_else(|| PrepareError::Format {
                row: row_no,
                column: "Transaction Date",
                value: raw.transaction_date.clone(),
                expected: "date",
            })?;

        let customer_age: f64 =
            raw.customer_age
                .trim()
                .parse()
                .map_err(|_| PrepareError::Format {
                    row: row_no,
                    column: "Customer Age",
                    value: raw.customer_age.clone(),
                    expected: "number",
                })?;

        quotes.push(QuoteRecord {
            quote_number: raw.quote_number,
            transaction_date,
            test_group: raw.test_group,
            sale_indicator: raw.sale_indicator,
            net_price: raw.net_price,
            profit: raw.profit,
            tax: raw.tax,
            total_price: raw.total_price,
            customer_age,
            licence_length: raw.licence_length.ceil(),
            marital_status: raw.marital_status,
            credit_score: raw.credit_score,
            vehicle_mileage: raw.vehicle_mileage,
            vehicle_value: raw.vehicle_value,
        });
    }

    Ok(QuoteDataset::from_quotes(quotes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, age: &str, licence: f64) -> RawQuote {
        RawQuote {
            quote_number: 7,
            transaction_date: date.to_string(),
            test_group: "Control".to_string(),
            sale_indicator: 1,
            net_price: 100.0,
            profit: 20.0,
            tax: 12.0,
            total_price: 112.0,
            customer_age: age.to_string(),
            licence_length: licence,
            marital_status: "Married".to_string(),
            credit_score: 640.0,
            vehicle_mileage: 42_000.0,
            vehicle_value: 8_500.0,
        }
    }

    #[test]
    fn parses_dates_and_coerces_age() {
        let ds = prepare(vec![raw("2021-03-14", "47", 5.0)]).unwrap();
        let q = &ds.quotes[0];
        assert_eq!(
            q.transaction_date,
            NaiveDate::from_ymd_opt(2021, 3, 14).unwrap()
        );
        assert_eq!(q.customer_age, 47.0);
    }

    #[test]
    fn accepts_slash_separated_dates() {
        let ds = prepare(vec![raw("14/03/2021", "47", 5.0)]).unwrap();
        assert_eq!(
            ds.quotes[0].transaction_date,
            NaiveDate::from_ymd_opt(2021, 3, 14).unwrap()
        );
    }

    #[test]
    fn licence_length_is_rounded_up() {
        let ds = prepare(vec![raw("2021-01-01", "30", 2.3)]).unwrap();
        assert_eq!(ds.quotes[0].licence_length, 3.0);
    }

    #[test]
    fn whole_licence_lengths_keep_their_bucket() {
        let ds = prepare(vec![raw("2021-01-01", "30", 4.0)]).unwrap();
        assert_eq!(ds.quotes[0].licence_length, 4.0);
    }

    #[test]
    fn bad_date_fails_with_format_error() {
        let err = prepare(vec![raw("not-a-date", "30", 1.0)]).unwrap_err();
        assert_eq!(
            err,
            PrepareError::Format {
                row: 0,
                column: "Transaction Date",
                value: "not-a-date".to_string(),
                expected: "date",
            }
        );
    }

    #[test]
    fn bad_age_fails_with_format_error() {
        let err = prepare(vec![
            raw("2021-01-01", "30", 1.0),
            raw("2021-01-02", "unknown", 1.0),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            PrepareError::Format {
                row: 1,
                column: "Customer Age",
                value: "unknown".to_string(),
                expected: "number",
            }
        );
    }
}
