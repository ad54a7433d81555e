//! Reports: a metric plus per-run options, rendered to a SELECT.
//!
//! ```
//! use active_reporting::prelude::*;
//!
//! let catalog = Catalog::new([FactModel::new("post", "posts").dimension("state")]).unwrap();
//! let metric = Metric::new(
//!     MetricDefinition::new("a_metric", "post").dimension("state"),
//!     &catalog,
//! )
//! .unwrap();
//! let sql = metric.report().unwrap().to_sql(Dialect::Postgres).unwrap();
//! assert!(sql.starts_with("SELECT\n  \"posts\".\"state\" AS \"state\""));
//! ```

pub mod dimension;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReportingError, Result};
use crate::metric::{Metric, MetricFilter};
use crate::model::FilterValue;
use crate::sql::{Dialect, ExprExt, OrderByExpr, Query, SelectExpr, TableRef};

pub use dimension::{ReportingDimension, ReportingDimensionKind};

/// Fails on the first output column name that repeats.
pub(crate) fn check_unique_columns(columns: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    match columns.iter().find(|column| !seen.insert(column.as_str())) {
        Some(column) => Err(ReportingError::DuplicateColumn(column.clone())),
        None => Ok(()),
    }
}

/// Per-run report options layered over the metric's own settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Also select each association's key as `<dimension>_identifier`.
    pub dimension_identifiers: bool,
    /// Merged over the metric's dimension filter; same names win here.
    pub dimension_filter: BTreeMap<String, FilterValue>,
    /// Replaces the metric's filter when set.
    pub metric_filter: Option<MetricFilter>,
    pub limit: Option<u64>,
}

impl ReportOptions {
    pub fn with_dimension_identifiers(mut self, enabled: bool) -> Self {
        self.dimension_identifiers = enabled;
        self
    }

    pub fn with_dimension_filter(
        mut self,
        name: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.dimension_filter.insert(name.into(), value.into());
        self
    }

    pub fn with_metric_filter(mut self, filter: MetricFilter) -> Self {
        self.metric_filter = Some(filter);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A metric bound to report options.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    metric: Metric,
    dimension_identifiers: bool,
    dimension_filter: BTreeMap<String, FilterValue>,
    metric_filter: MetricFilter,
    limit: Option<u64>,
}

impl Report {
    pub fn new(metric: &Metric, options: ReportOptions) -> Result<Self> {
        let fact_model = metric.fact_model();
        fact_model.check_dimension_filter(&options.dimension_filter)?;

        let mut dimension_filter = metric.dimension_filter().clone();
        dimension_filter.extend(options.dimension_filter);

        let metric_filter = options.metric_filter.unwrap_or(*metric.metric_filter());
        metric_filter.validate()?;

        let report = Self {
            metric: metric.clone(),
            dimension_identifiers: options.dimension_identifiers,
            dimension_filter,
            metric_filter,
            limit: options.limit,
        };
        check_unique_columns(&report.columns())?;
        Ok(report)
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    pub fn dimension_filter(&self) -> &BTreeMap<String, FilterValue> {
        &self.dimension_filter
    }

    pub fn metric_filter(&self) -> &MetricFilter {
        &self.metric_filter
    }

    /// Output column names in select order.
    pub fn columns(&self) -> Vec<String> {
        let dimensions = self.metric.dimensions();
        let mut columns: Vec<String> = dimensions.iter().map(ReportingDimension::alias).collect();
        if self.dimension_identifiers {
            columns.extend(dimensions.iter().filter_map(ReportingDimension::identifier_alias));
        }
        columns.push(self.metric.name().to_string());
        columns
    }

    pub fn to_query(&self, dialect: Dialect) -> Result<Query> {
        let fact_model = self.metric.fact_model();
        let dimensions = self.metric.dimensions();
        let aggregate = self.metric.aggregate().sql_expr(fact_model);

        let mut select: Vec<SelectExpr> = Vec::with_capacity(dimensions.len() * 2 + 1);
        let mut group_by = Vec::new();
        for dimension in dimensions {
            select.push(dimension.select_expr(dialect)?.alias(&dimension.alias()));
            group_by.extend(dimension.group_exprs(dialect)?);
        }
        if self.dimension_identifiers {
            for dimension in dimensions {
                if let (Some(expr), Some(alias)) =
                    (dimension.identifier_expr(), dimension.identifier_alias())
                {
                    select.push(expr.clone().alias(&alias));
                    group_by.push(expr);
                }
            }
        }
        select.push(aggregate.clone().alias(self.metric.name()));

        let mut query = Query::new()
            .select(select)
            .from(TableRef::new(&fact_model.table));

        for (table, on) in dimensions.iter().filter_map(ReportingDimension::join) {
            query = query.inner_join(table, on);
        }

        for (name, value) in &self.dimension_filter {
            if let Some(filter) = fact_model.dimension_filter(name) {
                query = query.filter(filter.to_expr(&fact_model.table, value)?);
            }
        }

        query = query.group_by(group_by);

        if let Some(having) = self.metric_filter.to_having(&aggregate)? {
            query = query.having(having);
        }

        let mut order_by = Vec::new();
        for order in self.metric.order_by_dimension() {
            if let Some(dimension) = dimensions.iter().find(|d| d.name() == order.dimension) {
                order_by.push(
                    OrderByExpr::new(dimension.order_expr(dialect)?)
                        .with_dir(order.direction.into()),
                );
            }
        }
        query = query.order_by(order_by);

        if let Some(limit) = self.limit {
            query = query.limit(limit);
        }

        Ok(query)
    }

    pub fn to_sql(&self, dialect: Dialect) -> Result<String> {
        let sql = self.to_query(dialect)?.to_sql(dialect);
        debug!(
            metric = %self.metric.name(),
            dialect = %dialect,
            columns = self.columns().len(),
            "rendered report"
        );
        Ok(sql)
    }
}
