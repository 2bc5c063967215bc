/// Data layer: transaction model, loading, buyer/seller resolution,
/// progressive filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  coerce cells, keep allowed HS codes
///   └──────────┘
///        │   resolve: buyer / seller per row (normalize: name comparison)
///        ▼
///   ┌──────────┐
///   │ Dataset   │  immutable Vec<Transaction>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterState → filtered rows + dropdown options
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  metrics, top-N breakdowns, daily series
///   └───────────┘   (table: fixed display schema, sort, search)
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod resolve;
pub mod table;
