// src/model/filter.rs
use serde::{Deserialize, Serialize};

use crate::error::{ReportingError, Result};
use crate::sql::{lit_bool, lit_float, lit_int, lit_str, table_col, Expr, ExprExt};

/// Comparison applied by a dimension filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    #[default]
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Like,
    IsNull,
}

/// A named predicate on a fact table column, parametrized by the value the
/// metric or report supplies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionFilterDef {
    pub name: String,
    pub column: String,
    #[serde(default)]
    pub operator: FilterOperator,
}

/// Value bound to a dimension filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FilterValue>),
}

impl FilterValue {
    fn scalar_expr(&self) -> Option<Expr> {
        match self {
            FilterValue::Bool(b) => Some(lit_bool(*b)),
            FilterValue::Int(n) => Some(lit_int(*n)),
            FilterValue::Float(f) => Some(lit_float(*f)),
            FilterValue::String(s) => Some(lit_str(s)),
            FilterValue::List(_) => None,
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            FilterValue::Float(f) => f.is_finite(),
            FilterValue::List(items) => items.iter().all(FilterValue::is_finite),
            _ => true,
        }
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Int(n)
    }
}

impl From<f64> for FilterValue {
    fn from(f: f64) -> Self {
        FilterValue::Float(f)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(items: Vec<T>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl DimensionFilterDef {
    pub fn new(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            operator: FilterOperator::Eq,
        }
    }

    pub fn with_operator(mut self, operator: FilterOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Check that `value` has the shape this filter's operator expects.
    pub fn check_value(&self, value: &FilterValue) -> Result<()> {
        let invalid = |reason: &str| ReportingError::InvalidFilterValue {
            filter: self.name.clone(),
            reason: reason.to_string(),
        };

        if !value.is_finite() {
            return Err(invalid("floats must be finite"));
        }

        match (self.operator, value) {
            (FilterOperator::In, FilterValue::List(items)) => {
                if items.iter().any(|v| matches!(v, FilterValue::List(_))) {
                    return Err(invalid("nested lists are not allowed"));
                }
                Ok(())
            }
            (FilterOperator::In, _) => Err(invalid("'in' expects a list")),
            (FilterOperator::IsNull, FilterValue::Bool(_)) => Ok(()),
            (FilterOperator::IsNull, _) => Err(invalid("'is_null' expects a boolean")),
            (FilterOperator::Like, FilterValue::String(_)) => Ok(()),
            (FilterOperator::Like, _) => Err(invalid("'like' expects a string")),
            (_, FilterValue::List(_)) => Err(invalid("a list is only valid with 'in'")),
            _ => Ok(()),
        }
    }

    /// Build the WHERE predicate against `table`.
    pub fn to_expr(&self, table: &str, value: &FilterValue) -> Result<Expr> {
        self.check_value(value)?;
        let column = table_col(table, &self.column);

        let expr = match (self.operator, value) {
            (FilterOperator::In, FilterValue::List(items)) => {
                column.in_list(items.iter().filter_map(FilterValue::scalar_expr).collect())
            }
            (FilterOperator::IsNull, FilterValue::Bool(true)) => column.is_null(),
            (FilterOperator::IsNull, _) => column.is_not_null(),
            (op, v) => {
                let Some(rhs) = v.scalar_expr() else {
                    return Err(ReportingError::InvalidFilterValue {
                        filter: self.name.clone(),
                        reason: "expected a scalar".into(),
                    });
                };
                match op {
                    FilterOperator::Ne => column.ne(rhs),
                    FilterOperator::Gt => column.gt(rhs),
                    FilterOperator::Gte => column.gte(rhs),
                    FilterOperator::Lt => column.lt(rhs),
                    FilterOperator::Lte => column.lte(rhs),
                    FilterOperator::Like => column.like(rhs),
                    _ => column.eq(rhs),
                }
            }
        };
        Ok(expr)
    }
}
