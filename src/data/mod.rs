/// Data layer: feature-file loading, caching, and the dataset view.
///
/// Architecture:
/// ```text
///  <dir>/**/<class>_<id>.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  walk dir → coerce fields → cap per file → remap labels
///   └──────────┘
///        │  ▲
///        ▼  │
///   ┌──────────┐
///   │  cache    │  <dir>/features.parquet
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ Dataset       │  Array2<f64> features, Array1<i64> labels
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ WebsiteData   │  per-site / per-feature copies
///   └──────────────┘
/// ```

pub mod cache;
pub mod coerce;
pub mod loader;
pub mod model;
