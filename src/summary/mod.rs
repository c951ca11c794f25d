/// Derived views: pure functions from a borrowed `Dataset` to owned tables.
///
/// ```text
///   Dataset ──┬── describe    count / mean / std / quartiles per numeric column
///             ├── metadata    name, type, non-null count per column
///             ├── aggregate   category means, crosstabs, correlation,
///             │               value counts, histograms, group summaries
///             └── indicators  headline numbers for the demographics page
/// ```

pub mod aggregate;
pub mod describe;
pub mod indicators;
pub mod metadata;
