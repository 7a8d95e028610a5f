/// Data layer: core types, loading, preparation, and aggregation.
///
/// Architecture:
/// ```text
///      quotes .csv
///          │
///          ▼
///     ┌──────────┐
///     │  loader   │  parse file → Vec<RawQuote>
///     └──────────┘
///          │
///          ▼
///     ┌──────────┐
///     │  prepare  │  coerce dates/ages, bucket licence length
///     └──────────┘
///          │
///          ▼
///     ┌─────────────┐
///     │ QuoteDataset │  immutable working table + cohort index
///     └─────────────┘
///          │
///          ▼
///     ┌───────────┐
///     │ aggregate  │  metric selector → chart-ready series
///     └───────────┘
/// ```

pub mod aggregate;
pub mod loader;
pub mod model;
pub mod prepare;
