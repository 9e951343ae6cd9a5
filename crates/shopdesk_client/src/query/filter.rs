//! Filter operators.

use serde_json::Value;
use std::fmt;

/// Filter operators a query chain accepts.
///
/// Only [`FilterOp::Eq`] is evaluated. The others are accepted so existing
/// call chains keep working, and are recorded on the descriptor as inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// Equality. Evaluated.
    Eq,
    /// Inequality. Inert.
    Neq,
    /// Greater than. Inert.
    Gt,
    /// Greater than or equal. Inert.
    Gte,
    /// Less than. Inert.
    Lt,
    /// Less than or equal. Inert.
    Lte,
    /// Case-sensitive pattern match. Inert.
    Like,
    /// Case-insensitive pattern match. Inert.
    ILike,
    /// Set membership. Inert.
    In,
    /// Identity comparison (`is null`, `is true`). Inert.
    Is,
}

impl FilterOp {
    /// Returns true if the operator affects query results.
    pub fn is_supported(self) -> bool {
        matches!(self, FilterOp::Eq)
    }

    /// PostgREST operator name.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Neq => "neq",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
            FilterOp::Like => "like",
            FilterOp::ILike => "ilike",
            FilterOp::In => "in",
            FilterOp::Is => "is",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One filter in a query chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column name.
    pub column: String,
    /// Operator.
    pub op: FilterOp,
    /// Operand.
    pub value: Value,
}

impl Filter {
    /// Creates a filter.
    pub fn new(column: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}.{}", self.column, self.op, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_eq_is_supported() {
        assert!(FilterOp::Eq.is_supported());
        for op in [
            FilterOp::Neq,
            FilterOp::Gt,
            FilterOp::Gte,
            FilterOp::Lt,
            FilterOp::Lte,
            FilterOp::Like,
            FilterOp::ILike,
            FilterOp::In,
            FilterOp::Is,
        ] {
            assert!(!op.is_supported(), "{op} should be inert");
        }
    }

    #[test]
    fn filter_display() {
        let filter = Filter::new("business_id", FilterOp::Eq, "B1");
        assert_eq!(filter.to_string(), "business_id=eq.\"B1\"");
    }
}
