/// Data layer: core types, loading, filtering, aggregation, export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  ordered columns, positional rows, value index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌────────────────────┐
///   │  filter   │ ───▶ │ metrics / summary  │  scalars + chart data
///   └──────────┘      └────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  filtered Table → CSV
///   └──────────┘
/// ```
///
/// Everything here is pure and UI-independent: each interaction re-runs
/// filter + metrics from (session table, current selections).
pub mod export;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod summary;
