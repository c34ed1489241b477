use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::descriptor::AggregateOp;
use super::filter::{FilterGroup, FilterRule};
use super::types::{LogicalOperator, SortDirection};

/// Row as returned by the query service
pub type Row = Map<String, Value>;

/// Request body of the generic "query by table + filter descriptor" endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// Joined-table expression
    pub table: String,
    /// Projection, aggregation, filter and ordering descriptor
    pub filters: QueryFilterSet,
    /// Requested page, 1-based; absent for aggregate queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size; effectively 1 for aggregate queries
    pub page_size: u32,
}

/// Filter/aggregation descriptor inside a request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilterSet {
    /// Columns to project
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub selects: Vec<SelectSpec>,
    /// Aggregations to compute
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub aggregations: Vec<AggregationSpec>,
    /// Filter groups in dispatch order
    pub filter_groups: Vec<FilterGroupSpec>,
    /// Ordering rules
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub order: Vec<OrderSpec>,
}

/// Filter group (owned wire form).
///
/// The session-side [`FilterGroup`] carries an id and a user-visible
/// name; the service only understands rules plus their combinator, and
/// identical view state must produce byte-identical request bodies, so
/// only these two fields go on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGroupSpec {
    pub filters: Vec<FilterRule>,
    #[serde(rename = "logicalOperator")]
    pub logical_operator: LogicalOperator,
}

impl From<&FilterGroup> for FilterGroupSpec {
    fn from(group: &FilterGroup) -> Self {
        Self {
            filters: group.filters.clone(),
            logical_operator: group.logical_operator,
        }
    }
}

/// Projected column (owned wire form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectSpec {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alias: Option<String>,
}

/// Aggregation (owned wire form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationSpec {
    pub key: String,
    pub alias: String,
    pub operation: AggregateOp,
}

/// Ordering rule (owned wire form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSpec {
    pub key: String,
    pub direction: SortDirection,
}

/// Successful response of the query service.
///
/// `data` carries either a row page or an aggregate row set; `page` and
/// `total_records` are only meaningful for paginated queries and the
/// server's values are authoritative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Row page or aggregate row set
    #[serde(default)]
    pub data: Vec<Row>,
    /// Server-reported page (clamped when the request overshot)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page: Option<u32>,
    /// Total record count, or the server's estimate
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_records: Option<u64>,
}
