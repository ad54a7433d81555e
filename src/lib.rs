//! # active-reporting
//!
//! Fact models, metrics and reports that compile to dialect-specific SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          FactModel declarations (reporting.toml)         │
//! │   (tables, dimensions, hierarchies, labels, filters)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [Catalog::new - validated]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Metric                                │
//! │   (aggregate + resolved ReportingDimensions)             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [Report + ReportOptions]
//! ┌─────────────────────────────────────────────────────────┐
//! │           sql::Query → SQL per Dialect                   │
//! │   (DATE_TRUNC via functions::datetime)                   │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod functions;
pub mod metric;
pub mod model;
pub mod report;
pub mod sql;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::error::{ReportingError, Result};
    pub use crate::functions::datetime::{
        is_valid_precision_unit, render_date_truncation, supported_precision_units,
        PrecisionUnit,
    };
    pub use crate::metric::{
        Aggregate, DimensionRequest, Metric, MetricDefinition, MetricFilter, SortDirection,
    };
    pub use crate::model::{
        Catalog, DimensionDef, DimensionFilterDef, FactModel, FilterOperator, FilterValue,
    };
    pub use crate::report::{Report, ReportOptions, ReportingDimension};
}

// Also export at crate root for convenience
pub use error::{ReportingError, Result};
pub use metric::{Metric, MetricDefinition};
pub use model::{Catalog, FactModel};
pub use report::{Report, ReportOptions};
pub use sql::Dialect;
