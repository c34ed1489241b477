use serde::{Deserialize, Serialize};

/// Static query definition for one report type.
///
/// Descriptors are constants created at process start and never mutated;
/// the table expression is opaque to this crate and passed through to the
/// query service verbatim.
#[derive(Debug, Clone)]
pub struct ReportQueryDescriptor {
    /// Joined-table expression understood by the query service
    pub table: &'static str,
    /// Columns to project, in order
    pub selects: &'static [SelectColumn],
    /// Aggregations to compute; aliases are unique within the list
    pub aggregations: &'static [AggregationDef],
    /// Column used for date-range filtering; empty when date filtering
    /// does not apply to this report
    pub date_field: &'static str,
    /// Column the warehouse quick filter binds to
    pub warehouse_field: &'static str,
    /// Searchable columns; the first entry is the default
    pub search_columns: &'static [SearchColumn],
}

impl ReportQueryDescriptor {
    /// Default search column (first in the list)
    pub fn default_search_column(&self) -> &'static SearchColumn {
        &self.search_columns[0]
    }

    /// Look up a search column by its stable key
    pub fn search_column(&self, key: &str) -> Option<&'static SearchColumn> {
        self.search_columns.iter().find(|c| c.key == key)
    }
}

/// Projected column
#[derive(Debug, Clone)]
pub struct SelectColumn {
    /// Column expression
    pub key: &'static str,
    /// Alias the column comes back under, when it differs from the key
    pub alias: Option<&'static str>,
}

/// Server-side reduction over the filtered row set
#[derive(Debug, Clone)]
pub struct AggregationDef {
    /// Column expression to aggregate
    pub key: &'static str,
    /// Field name expected back in the aggregate result row
    pub alias: &'static str,
    /// Reduction to apply
    pub op: AggregateOp,
}

/// Aggregate operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateOp {
    Sum,
    Count,
    CountDistinct,
}

impl AggregateOp {
    /// Get SQL function name
    pub fn as_sql(&self) -> &'static str {
        match self {
            AggregateOp::Sum => "SUM",
            AggregateOp::Count => "COUNT",
            AggregateOp::CountDistinct => "COUNT DISTINCT",
        }
    }
}

/// Searchable column metadata.
///
/// `key` is stable across report types so an active search can be
/// re-attached after the report changes. A column without `table_field`
/// is a UI-only label and cannot produce a server-side filter.
#[derive(Debug, Clone)]
pub struct SearchColumn {
    /// Stable identifier
    pub key: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Column expression for server-side filtering
    pub table_field: Option<&'static str>,
}

impl SearchColumn {
    /// Whether this column can be used for server-side filtering
    pub fn can_filter(&self) -> bool {
        self.table_field.is_some()
    }
}
