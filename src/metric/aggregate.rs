use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReportingError;
use crate::model::FactModel;
use crate::sql::{func, star, table_col, Expr};

/// Aggregate applied to a fact model's measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    #[default]
    Count,
    Sum,
    Max,
    Min,
    Avg,
}

impl Aggregate {
    pub const ALL: [Aggregate; 5] = [
        Aggregate::Count,
        Aggregate::Sum,
        Aggregate::Max,
        Aggregate::Min,
        Aggregate::Avg,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Aggregate::Count => "count",
            Aggregate::Sum => "sum",
            Aggregate::Max => "max",
            Aggregate::Min => "min",
            Aggregate::Avg => "avg",
        }
    }

    /// `count` works without a measure; every other aggregate needs one.
    pub const fn requires_measure(self) -> bool {
        !matches!(self, Aggregate::Count)
    }

    /// Aggregate expression over `fact_model`'s measure, `COUNT(*)` when a
    /// count has no measure.
    pub fn sql_expr(self, fact_model: &FactModel) -> Expr {
        let arg = match &fact_model.measure {
            Some(measure) => table_col(&fact_model.table, measure),
            None => star(),
        };
        func(self.as_str(), vec![arg])
    }
}

impl FromStr for Aggregate {
    type Err = ReportingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Aggregate::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ReportingError::UnknownAggregate(s.to_string()))
    }
}

impl std::fmt::Display for Aggregate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
