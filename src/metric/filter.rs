use serde::{Deserialize, Serialize};

use crate::error::{ReportingError, Result};
use crate::sql::{lit_float, lit_int, Expr, ExprExt};

/// Bounds on a metric's aggregate value, rendered as `HAVING`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
}

impl MetricFilter {
    pub fn is_empty(&self) -> bool {
        self.bounds().next().is_none()
    }

    fn bounds(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("eq", self.eq),
            ("gt", self.gt),
            ("gte", self.gte),
            ("lt", self.lt),
            ("lte", self.lte),
        ]
        .into_iter()
        .filter_map(|(op, v)| v.map(|v| (op, v)))
    }

    pub fn validate(&self) -> Result<()> {
        match self.bounds().find(|(_, v)| !v.is_finite()) {
            Some((op, v)) => Err(ReportingError::InvalidMetricFilter(format!(
                "'{}' bound must be finite, got {}",
                op, v
            ))),
            None => Ok(()),
        }
    }

    /// AND of every bound applied to `aggregate`, or `None` when unbounded.
    pub fn to_having(&self, aggregate: &Expr) -> Result<Option<Expr>> {
        self.validate()?;
        Ok(self
            .bounds()
            .map(|(op, v)| {
                let lhs = aggregate.clone();
                let rhs = number(v);
                match op {
                    "gt" => lhs.gt(rhs),
                    "gte" => lhs.gte(rhs),
                    "lt" => lhs.lt(rhs),
                    "lte" => lhs.lte(rhs),
                    _ => lhs.eq(rhs),
                }
            })
            .reduce(|acc, cond| acc.and(cond)))
    }
}

// Integral bounds render without a fractional part.
fn number(v: f64) -> Expr {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        lit_int(v as i64)
    } else {
        lit_float(v)
    }
}
