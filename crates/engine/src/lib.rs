//! Report query-configuration and aggregation-merging engine.
//!
//! Declarative per-report query descriptors, filter assembly from view
//! state, cancelable paginated/aggregate fetches over a generic query
//! service, and consolidation of per-report aggregates into one summary.
//! The surrounding application supplies the [`service::QueryService`]
//! transport and renders the results; nothing here touches the network
//! or a UI toolkit directly.

pub mod catalog;
pub mod filters;
pub mod merge;
pub mod service;
pub mod slot;
pub mod state;
pub mod stats;
pub mod table;

pub use catalog::{descriptor, mandatory_filters, resolve_search_column, search_columns};
pub use filters::build_filters;
pub use merge::{MergeOptions, MultiReportMerger};
pub use service::{FetchError, QueryService};
pub use stats::StatsAggregator;
pub use table::{TableDataLoader, TablePage};
