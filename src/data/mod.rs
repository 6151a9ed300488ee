/// Data layer: case records, loading and caching, filtering, aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json          .parquet
///        │                          │
///        ▼                          ▼
///   ┌──────────┐  normalize  ┌──────────┐
///   │  source   │ ──────────► │  cache    │
///   └──────────┘             └──────────┘
///        │                          │
///        └────────► loader ◄────────┘   memoized Arc<CaseDataset>
///                     │
///                     ▼
///               ┌──────────┐
///               │  filter   │  criteria → predicates → FilteredView
///               └──────────┘
///                 │      │
///                 ▼      ▼
///         aggregate    annotate       metrics, ranking, labelled rows
/// ```

pub mod aggregate;
pub mod annotate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod source;
