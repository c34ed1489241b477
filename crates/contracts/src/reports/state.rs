use serde::{Deserialize, Serialize};

use super::dates::DateRange;
use super::filter::FilterGroup;
use super::types::{ReportType, SortRule};

/// Filter-authoring mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Fixed filter recipe (search + warehouse + dates + mandatory rules)
    Quick,
    /// Raw filter-group editing
    Advanced,
}

/// Explicit, serializable session state of one report view.
///
/// Created on navigation, mutated by user interaction, discarded on
/// navigation away. There are no globals: the state is threaded by
/// reference through the pure filter-building functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportViewState {
    /// Active report
    pub report_type: ReportType,
    /// Search term as typed; only attached to a request once applied
    pub search_term: String,
    /// Key of the active search column
    pub search_column: String,
    /// Whether the user has explicitly submitted the term. A term is
    /// bound to one specific column; column changes clear this flag.
    pub search_applied: bool,
    /// Selected warehouse, empty for "all"
    pub warehouse_filter: String,
    /// Date range; filters only when both bounds are set
    pub date_range: DateRange,
    /// Quick or advanced filter authoring
    pub mode: FilterMode,
    /// User-defined groups, used in advanced mode only
    pub advanced_groups: Vec<FilterGroup>,
    /// Ordering rules
    pub sort_rules: Vec<SortRule>,
}

impl ReportViewState {
    /// Fresh state for a report with the given active search column
    pub fn new(report_type: ReportType, search_column: impl Into<String>) -> Self {
        Self {
            report_type,
            search_term: String::new(),
            search_column: search_column.into(),
            search_applied: false,
            warehouse_filter: String::new(),
            date_range: DateRange::default(),
            mode: FilterMode::Quick,
            advanced_groups: Vec::new(),
            sort_rules: Vec::new(),
        }
    }
}
