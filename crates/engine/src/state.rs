//! View-state transitions that must stay consistent with the catalog.
//!
//! A search term is bound to one specific column: whenever the active
//! column changes (directly, or indirectly through a report-type change)
//! the applied flag is cleared and the user must re-submit.

use contracts::reports::{ReportType, ReportViewState};

use crate::catalog;

/// Fresh view state for a report, with its default search column active
pub fn new_view_state(report_type: ReportType) -> ReportViewState {
    let column = catalog::descriptor(report_type).default_search_column();
    ReportViewState::new(report_type, column.key)
}

/// Switch the view to another report type.
///
/// The search column is re-resolved by key (best effort); when the
/// resolved column differs from the previous one the submitted search no
/// longer applies.
pub fn change_report_type(state: &mut ReportViewState, report_type: ReportType) {
    let column = catalog::resolve_search_column(report_type, &state.search_column);
    if column.key != state.search_column {
        state.search_applied = false;
        state.search_column = column.key.to_string();
    }
    state.report_type = report_type;
    // warehouse values are report-specific page observations
    state.warehouse_filter.clear();
}

/// Switch the active search column. Always clears the applied flag.
pub fn change_search_column(state: &mut ReportViewState, key: &str) {
    if state.search_column != key {
        state.search_column = key.to_string();
    }
    state.search_applied = false;
}

/// Mark the current term as submitted
pub fn apply_search(state: &mut ReportViewState) {
    state.search_applied = true;
}

/// Drop the term and the applied flag
pub fn clear_search(state: &mut ReportViewState) {
    state.search_term.clear();
    state.search_applied = false;
}
