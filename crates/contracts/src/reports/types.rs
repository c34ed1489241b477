use serde::{Deserialize, Serialize};
use std::fmt;

/// Business report view selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Sales documents
    Ventas,
    /// Purchase documents
    Compras,
    /// Shrinkage movements
    Mermas,
    /// Current stock
    Inventario,
    /// Consolidated sales/purchases/shrinkage comparison
    Comparacion,
}

impl ReportType {
    /// Stable identifier used in wire payloads and lookups
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Ventas => "ventas",
            ReportType::Compras => "compras",
            ReportType::Mermas => "mermas",
            ReportType::Inventario => "inventario",
            ReportType::Comparacion => "comparacion",
        }
    }

    /// All supported report types
    pub fn all() -> &'static [ReportType] {
        &[
            ReportType::Ventas,
            ReportType::Compras,
            ReportType::Mermas,
            ReportType::Inventario,
            ReportType::Comparacion,
        ]
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter operator understood by the remote query service.
/// Serializes as the SQL token the service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// Equal (=)
    #[serde(rename = "=")]
    Eq,
    /// Not equal (<>)
    #[serde(rename = "<>")]
    NotEq,
    /// Greater than (>)
    #[serde(rename = ">")]
    Gt,
    /// Less than (<)
    #[serde(rename = "<")]
    Lt,
    /// Greater than or equal (>=)
    #[serde(rename = ">=")]
    GtEq,
    /// Less than or equal (<=)
    #[serde(rename = "<=")]
    LtEq,
    /// Like pattern matching
    #[serde(rename = "LIKE")]
    Like,
    /// Negated pattern matching
    #[serde(rename = "NOT LIKE")]
    NotLike,
    /// In comma-separated list
    #[serde(rename = "IN")]
    In,
    /// Not in comma-separated list
    #[serde(rename = "NOT IN")]
    NotIn,
    /// Is NULL
    #[serde(rename = "IS NULL")]
    IsNull,
    /// Is NOT NULL
    #[serde(rename = "IS NOT NULL")]
    IsNotNull,
}

impl Operator {
    /// Get SQL operator string
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::GtEq => ">=",
            Operator::LtEq => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    /// Whether the operator takes a right-hand value.
    /// NULL tests carry no value; a rule built with one must null its value out.
    pub fn needs_value(&self) -> bool {
        !matches!(self, Operator::IsNull | Operator::IsNotNull)
    }
}

/// How the rules inside a filter group combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Single sorting rule, applied in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRule {
    /// Column to sort by
    pub key: String,
    /// Sort direction
    pub direction: SortDirection,
}
