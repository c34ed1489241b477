//! Filter assembly: view state in, final filter payload out.
//!
//! Pure functions; the payload ordering is deterministic (search,
//! warehouse, date bounds, mandatory rules) so identical state produces
//! identical request bodies.

use contracts::reports::{
    format_utc_date, FilterGroup, FilterMode, FilterPayload, FilterRule, Operator,
    ReportViewState,
};

use crate::catalog;

/// Minimum submitted term length before a search rule is produced
const MIN_SEARCH_LEN: usize = 2;

/// Assemble the filter payload for the current view state.
pub fn build_filters(state: &ReportViewState) -> FilterPayload {
    match state.mode {
        FilterMode::Quick => build_quick(state),
        FilterMode::Advanced => build_advanced(state),
    }
}

/// Quick mode: one AND group with the fixed recipe plus the report's
/// mandatory business rules.
fn build_quick(state: &ReportViewState) -> FilterPayload {
    let desc = catalog::descriptor(state.report_type);
    let mut rules = Vec::new();

    if let Some(rule) = search_rule(state) {
        rules.push(rule);
    }

    if !state.warehouse_filter.is_empty() {
        rules.push(FilterRule::new(
            desc.warehouse_field,
            Operator::Eq,
            state.warehouse_filter.clone(),
        ));
    }

    if state.date_range.is_complete() && !desc.date_field.is_empty() {
        // is_complete guarantees both bounds
        if let (Some(from), Some(to)) = (&state.date_range.from, &state.date_range.to) {
            rules.push(FilterRule::new(
                desc.date_field,
                Operator::GtEq,
                format_utc_date(from),
            ));
            rules.push(FilterRule::new(
                desc.date_field,
                Operator::LtEq,
                format_utc_date(to),
            ));
        }
    }

    rules.extend(catalog::mandatory_filters(state.report_type));

    if rules.is_empty() {
        return FilterPayload::default();
    }
    FilterPayload::new(vec![FilterGroup::and("filtros rapidos", rules)])
}

/// Advanced mode: the user's groups verbatim (minus incomplete rules),
/// then a separate AND group for the date range.
///
/// Mandatory business rules are NOT injected here; the user is assumed to
/// express them explicitly. That asymmetry with quick mode is inherited
/// behavior, kept deliberately.
fn build_advanced(state: &ReportViewState) -> FilterPayload {
    let desc = catalog::descriptor(state.report_type);
    let mut groups: Vec<FilterGroup> = state
        .advanced_groups
        .iter()
        .filter(|g| g.is_effective())
        .map(|g| g.sanitized())
        .collect();

    if state.date_range.is_complete() && !desc.date_field.is_empty() {
        if let (Some(from), Some(to)) = (&state.date_range.from, &state.date_range.to) {
            groups.push(FilterGroup::and(
                "rango de fechas",
                vec![
                    FilterRule::new(desc.date_field, Operator::GtEq, format_utc_date(from)),
                    FilterRule::new(desc.date_field, Operator::LtEq, format_utc_date(to)),
                ],
            ));
        }
    }

    FilterPayload::new(groups)
}

/// Search rule for the active column. Only produced when the user has
/// explicitly submitted a term of useful length and the column can
/// filter server-side; a stale `search_applied` with a too-short term
/// never leaks a rule.
fn search_rule(state: &ReportViewState) -> Option<FilterRule> {
    if !state.search_applied || state.search_term.chars().count() < MIN_SEARCH_LEN {
        return None;
    }
    let desc = catalog::descriptor(state.report_type);
    let column = desc.search_column(&state.search_column)?;
    let table_field = column.table_field?;
    Some(FilterRule::new(
        table_field,
        Operator::Like,
        state.search_term.clone(),
    ))
}
