/// Data layer: core types, loading, cleaning and caching.
///
/// Architecture:
/// ```text
///  https://…/sleep.csv   .csv / .json / .parquet
///             │                  │
///             ▼                  ▼
///        ┌──────────────────────────┐
///        │  loader                  │  fetch/parse → Dataset, drop `Unnamed*`
///        └──────────────────────────┘
///             │
///             ▼
///        ┌──────────────┐
///        │  normalize   │  trim + lowercase column names
///        └──────────────┘
///             │
///             ▼
///        ┌──────────────┐
///        │  cache       │  one snapshot, reloaded on refresh
///        └──────────────┘
/// ```

pub mod cache;
pub mod loader;
pub mod model;
pub mod normalize;
