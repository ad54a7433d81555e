//! Error types for fact models, metrics and reports.

use crate::functions::datetime::InvalidPrecisionError;
use crate::model::ValidationError;
use crate::sql::{Dialect, SqlDialect};

/// Result type for reporting operations.
pub type Result<T> = std::result::Result<T, ReportingError>;

/// Everything that can go wrong between declaring a fact model and
/// rendering a report's SQL.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportingError {
    #[error(transparent)]
    InvalidPrecision(#[from] InvalidPrecisionError),

    #[error("Unknown fact model: '{0}'")]
    UnknownFactModel(String),

    #[error("Unknown dimension '{dimension}' on fact model '{fact_model}'")]
    UnknownDimension {
        fact_model: String,
        dimension: String,
    },

    #[error("Dimension '{0}' is requested more than once")]
    DuplicateDimension(String),

    #[error("Output column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("Unknown aggregate '{0}'. Supported: count, sum, max, min, avg")]
    UnknownAggregate(String),

    #[error("Unknown dimension filter '{filter}' on fact model '{fact_model}'")]
    UnknownDimensionFilter { fact_model: String, filter: String },

    #[error("Invalid value for dimension filter '{filter}': {reason}")]
    InvalidFilterValue { filter: String, reason: String },

    #[error("Invalid label '{label}' for dimension '{dimension}': {reason}")]
    InvalidDimensionLabel {
        dimension: String,
        label: String,
        reason: String,
    },

    #[error("Dimension '{dimension}' needs a label: fact model '{fact_model}' has no default dimension label")]
    MissingDimensionLabel {
        dimension: String,
        fact_model: String,
    },

    #[error("Aggregate '{aggregate}' needs a measure but fact model '{fact_model}' declares none")]
    MissingMeasure {
        aggregate: String,
        fact_model: String,
    },

    #[error("Invalid metric filter: {0}")]
    InvalidMetricFilter(String),

    #[error("{} does not support date truncation", .0.title())]
    UnsupportedDateTruncation(Dialect),

    #[error("Invalid catalog: {}", format_validation_errors(.0))]
    InvalidCatalog(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
