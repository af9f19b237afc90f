/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, normalise categories → TransactionTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  process-wide, loaded once
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category / merchant / amount predicates → row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  volume, mean spend, per-user diversity and breakdown
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  view     │  one DashboardView per interaction
///   └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod store;
pub mod view;
