/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///   bike_df.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → BikeDataset (once per process)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  BikeDataset  │  Vec<BikeRecord>, categorical domains, date bounds
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range + season predicates → row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  grouped means / distributions → ViewModel
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
