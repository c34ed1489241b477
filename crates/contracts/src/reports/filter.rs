use serde::{Deserialize, Serialize};

use super::types::{LogicalOperator, Operator};

/// Single filter rule sent to the query service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Column the rule applies to
    pub key: String,
    /// Filter operator
    pub operator: Operator,
    /// Right-hand value; absent for NULL tests
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
}

impl FilterRule {
    /// Create a rule with a value. The value is dropped when the operator
    /// is a NULL test.
    pub fn new(key: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        let value = if operator.needs_value() {
            Some(value.into())
        } else {
            None
        };
        Self {
            key: key.into(),
            operator,
            value,
        }
    }

    /// Create a valueless NULL-test rule
    pub fn null_test(key: impl Into<String>, operator: Operator) -> Self {
        Self {
            key: key.into(),
            operator,
            value: None,
        }
    }

    /// Replace the operator, nulling the value out for NULL tests
    pub fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
        if !operator.needs_value() {
            self.value = None;
        }
    }

    /// A rule contributes to a request only when it has a key and either a
    /// non-empty value or a NULL-test operator.
    pub fn is_complete(&self) -> bool {
        if self.key.is_empty() {
            return false;
        }
        if !self.operator.needs_value() {
            return true;
        }
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }
}

/// Group of filter rules combined under one logical operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Unique identifier for this group
    pub id: String,
    /// User-defined name
    pub name: String,
    /// How the group's rules combine
    #[serde(rename = "logicalOperator")]
    pub logical_operator: LogicalOperator,
    /// Rules in this group
    pub filters: Vec<FilterRule>,
}

impl FilterGroup {
    /// Create a named AND group
    pub fn and(name: impl Into<String>, filters: Vec<FilterRule>) -> Self {
        Self::new(name, LogicalOperator::And, filters)
    }

    /// Create a new group with a fresh id
    pub fn new(
        name: impl Into<String>,
        logical_operator: LogicalOperator,
        filters: Vec<FilterRule>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            logical_operator,
            filters,
        }
    }

    /// Copy of the group with incomplete rules dropped
    pub fn sanitized(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            logical_operator: self.logical_operator,
            filters: self
                .filters
                .iter()
                .filter(|r| r.is_complete())
                .cloned()
                .collect(),
        }
    }

    /// Whether the group contributes anything to a request
    pub fn is_effective(&self) -> bool {
        self.filters.iter().any(|r| r.is_complete())
    }
}

/// Final filter payload assembled for one request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPayload {
    /// Groups in dispatch order
    pub groups: Vec<FilterGroup>,
}

impl FilterPayload {
    pub fn new(groups: Vec<FilterGroup>) -> Self {
        Self { groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_operator_drops_value() {
        let rule = FilterRule::new("venta.Cliente", Operator::IsNull, "ignored");
        assert_eq!(rule.value, None);
        assert!(rule.is_complete());
    }

    #[test]
    fn test_set_operator_nulls_value() {
        let mut rule = FilterRule::new("Almacen", Operator::Eq, "CENTRAL");
        assert_eq!(rule.value.as_deref(), Some("CENTRAL"));
        rule.set_operator(Operator::IsNotNull);
        assert_eq!(rule.value, None);
    }

    #[test]
    fn test_incomplete_rules() {
        assert!(!FilterRule::new("", Operator::Eq, "x").is_complete());
        assert!(!FilterRule::new("Almacen", Operator::Eq, "").is_complete());
        assert!(FilterRule::new("Almacen", Operator::Eq, "SUR").is_complete());
    }

    #[test]
    fn test_group_sanitize_and_effectiveness() {
        let group = FilterGroup::new(
            "Grupo 1",
            LogicalOperator::Or,
            vec![
                FilterRule::new("Almacen", Operator::Eq, ""),
                FilterRule::new("ART.Descripcion1", Operator::Like, "Coca"),
                FilterRule::null_test("venta.Vendedor", Operator::IsNull),
            ],
        );
        assert!(group.is_effective());
        let clean = group.sanitized();
        assert_eq!(clean.filters.len(), 2);
        assert_eq!(clean.id, group.id);

        let empty = FilterGroup::and("vacio", vec![FilterRule::new("X", Operator::Eq, "")]);
        assert!(!empty.is_effective());
    }
}
