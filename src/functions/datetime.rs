//! Datetime truncation adapter.
//!
//! Renders `DATE_TRUNC('<unit>', <table>.<column>)` for datetime drill-down.
//! The precision unit is checked against a closed allow-list before it is
//! interpolated: `DATE_TRUNC` takes its unit as a literal in a fixed
//! position, so the allow-list is the only guard on that argument. Table and
//! column identifiers are interpolated verbatim and must arrive pre-quoted.
//!
//! ```
//! use active_reporting::functions::datetime::render_date_truncation;
//!
//! let sql = render_date_truncation("day", "\"posts\"", "created_at").unwrap();
//! assert_eq!(sql, "DATE_TRUNC('day', \"posts\".created_at)");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ReportingError, Result};
use crate::sql::{Dialect, SqlDialect};

/// A time-truncation granularity accepted by `DATE_TRUNC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionUnit {
    Microseconds,
    Milliseconds,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
    Decade,
    Century,
    Millennium,
}

const PRECISION_UNITS: [PrecisionUnit; 13] = [
    PrecisionUnit::Microseconds,
    PrecisionUnit::Milliseconds,
    PrecisionUnit::Second,
    PrecisionUnit::Minute,
    PrecisionUnit::Hour,
    PrecisionUnit::Day,
    PrecisionUnit::Week,
    PrecisionUnit::Month,
    PrecisionUnit::Quarter,
    PrecisionUnit::Year,
    PrecisionUnit::Decade,
    PrecisionUnit::Century,
    PrecisionUnit::Millennium,
];

impl PrecisionUnit {
    /// The SQL name of this unit.
    pub const fn as_str(self) -> &'static str {
        match self {
            PrecisionUnit::Microseconds => "microseconds",
            PrecisionUnit::Milliseconds => "milliseconds",
            PrecisionUnit::Second => "second",
            PrecisionUnit::Minute => "minute",
            PrecisionUnit::Hour => "hour",
            PrecisionUnit::Day => "day",
            PrecisionUnit::Week => "week",
            PrecisionUnit::Month => "month",
            PrecisionUnit::Quarter => "quarter",
            PrecisionUnit::Year => "year",
            PrecisionUnit::Decade => "decade",
            PrecisionUnit::Century => "century",
            PrecisionUnit::Millennium => "millennium",
        }
    }

    /// Exact, case-sensitive lookup by SQL name.
    ///
    /// `"Year"` and `" year"` are not units.
    pub fn parse(candidate: &str) -> Option<Self> {
        PRECISION_UNITS
            .iter()
            .copied()
            .find(|unit| unit.as_str() == candidate)
    }
}

impl std::fmt::Display for PrecisionUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A precision value outside the allow-list reached the renderer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Interval value {value} is not valid for {}", .dialect.title())]
pub struct InvalidPrecisionError {
    pub value: String,
    pub dialect: Dialect,
}

/// The fixed allow-list of precision units, in declaration order.
pub fn supported_precision_units() -> &'static [PrecisionUnit] {
    &PRECISION_UNITS
}

/// Whether `candidate` names a supported precision unit.
///
/// Never fails: empty strings and arbitrary text return `false`.
pub fn is_valid_precision_unit(candidate: &str) -> bool {
    PrecisionUnit::parse(candidate).is_some()
}

/// Render a PostgreSQL `DATE_TRUNC` over `qualified_table_name.column_name`.
///
/// The table name must already be quoted by the caller; neither identifier
/// is escaped here.
pub fn render_date_truncation(
    precision_unit: &str,
    qualified_table_name: &str,
    column_name: &str,
) -> std::result::Result<String, InvalidPrecisionError> {
    render_truncation_expression(
        precision_unit,
        &format!("{}.{}", qualified_table_name, column_name),
    )
}

fn render_truncation_expression(
    precision_unit: &str,
    value_expression: &str,
) -> std::result::Result<String, InvalidPrecisionError> {
    truncation_sql(Dialect::Postgres, precision_unit, value_expression)
}

/// Dialect-aware variant used by the report renderer.
///
/// Fails with [`ReportingError::UnsupportedDateTruncation`] for dialects
/// without `DATE_TRUNC`, and with [`ReportingError::InvalidPrecision`] for
/// units outside the allow-list.
pub fn render_date_truncation_for(
    dialect: Dialect,
    precision_unit: &str,
    qualified_table_name: &str,
    column_name: &str,
) -> Result<String> {
    if !dialect.supports_date_trunc() {
        return Err(ReportingError::UnsupportedDateTruncation(dialect));
    }
    let value = format!("{}.{}", qualified_table_name, column_name);
    Ok(truncation_sql(dialect, precision_unit, &value)?)
}

fn truncation_sql(
    dialect: Dialect,
    precision_unit: &str,
    value_expression: &str,
) -> std::result::Result<String, InvalidPrecisionError> {
    if !is_valid_precision_unit(precision_unit) {
        return Err(InvalidPrecisionError {
            value: precision_unit.to_string(),
            dialect,
        });
    }
    Ok(format!(
        "DATE_TRUNC('{}', {})",
        precision_unit, value_expression
    ))
}
