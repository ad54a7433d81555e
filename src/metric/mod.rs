//! Metric definitions.
//!
//! A [`MetricDefinition`] is plain data, usually read from configuration.
//! [`Metric::new`] resolves it against a [`Catalog`]: the fact model, every
//! requested dimension and every filter are checked once, so a constructed
//! [`Metric`] always renders.

pub mod aggregate;
pub mod filter;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReportingError, Result};
use crate::model::{Catalog, FactModel, FilterValue};
use crate::report::{check_unique_columns, Report, ReportOptions, ReportingDimension};
use crate::sql::SortDir;

pub use aggregate::Aggregate;
pub use filter::MetricFilter;

/// A dimension a metric groups by, optionally with a label.
///
/// Deserializes from `"state"` or `{ name = "created_on", label = "month" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionRequest {
    Name(String),
    Labeled { name: String, label: String },
}

impl DimensionRequest {
    pub fn labeled(name: impl Into<String>, label: impl Into<String>) -> Self {
        DimensionRequest::Labeled {
            name: name.into(),
            label: label.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DimensionRequest::Name(name) | DimensionRequest::Labeled { name, .. } => name,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            DimensionRequest::Name(_) => None,
            DimensionRequest::Labeled { label, .. } => Some(label),
        }
    }
}

impl From<&str> for DimensionRequest {
    fn from(name: &str) -> Self {
        DimensionRequest::Name(name.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl From<SortDirection> for SortDir {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => SortDir::Asc,
            SortDirection::Desc => SortDir::Desc,
        }
    }
}

/// Ordering of report rows by one of the metric's dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByDimension {
    pub dimension: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl OrderByDimension {
    pub fn new(dimension: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            dimension: dimension.into(),
            direction,
        }
    }
}

fn default_aggregate() -> String {
    Aggregate::Count.as_str().to_string()
}

/// Unresolved metric as declared by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub name: String,
    pub fact_model: String,
    #[serde(default)]
    pub dimensions: Vec<DimensionRequest>,
    /// Aggregate name, checked when the metric is built.
    #[serde(default = "default_aggregate")]
    pub aggregate: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dimension_filter: BTreeMap<String, FilterValue>,
    #[serde(default, skip_serializing_if = "MetricFilter::is_empty")]
    pub metric_filter: MetricFilter,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by_dimension: Vec<OrderByDimension>,
}

impl MetricDefinition {
    pub fn new(name: impl Into<String>, fact_model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fact_model: fact_model.into(),
            dimensions: Vec::new(),
            aggregate: default_aggregate(),
            dimension_filter: BTreeMap::new(),
            metric_filter: MetricFilter::default(),
            order_by_dimension: Vec::new(),
        }
    }

    pub fn dimension(mut self, request: impl Into<DimensionRequest>) -> Self {
        self.dimensions.push(request.into());
        self
    }

    pub fn with_aggregate(mut self, aggregate: impl Into<String>) -> Self {
        self.aggregate = aggregate.into();
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
        self.metric_filter = filter;
        self
    }

    pub fn order_by(mut self, dimension: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by_dimension
            .push(OrderByDimension::new(dimension, direction));
        self
    }
}

/// A resolved metric over one fact model.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    name: String,
    fact_model: FactModel,
    dimensions: Vec<ReportingDimension>,
    aggregate: Aggregate,
    dimension_filter: BTreeMap<String, FilterValue>,
    metric_filter: MetricFilter,
    order_by_dimension: Vec<OrderByDimension>,
}

impl Metric {
    pub fn new(definition: MetricDefinition, catalog: &Catalog) -> Result<Self> {
        let fact_model = catalog.fact_model(&definition.fact_model)?;
        let aggregate: Aggregate = definition.aggregate.parse()?;

        if aggregate.requires_measure() && fact_model.measure.is_none() {
            return Err(ReportingError::MissingMeasure {
                aggregate: aggregate.to_string(),
                fact_model: fact_model.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        let mut dimensions = Vec::with_capacity(definition.dimensions.len());
        for request in &definition.dimensions {
            if !seen.insert(request.name()) {
                return Err(ReportingError::DuplicateDimension(request.name().to_string()));
            }
            dimensions.push(ReportingDimension::resolve(fact_model, request, catalog)?);
        }

        let mut columns: Vec<String> = dimensions.iter().map(ReportingDimension::alias).collect();
        columns.push(definition.name.clone());
        check_unique_columns(&columns)?;

        fact_model.check_dimension_filter(&definition.dimension_filter)?;
        definition.metric_filter.validate()?;

        for order in &definition.order_by_dimension {
            if !seen.contains(order.dimension.as_str()) {
                return Err(ReportingError::UnknownDimension {
                    fact_model: fact_model.name.clone(),
                    dimension: order.dimension.clone(),
                });
            }
        }

        debug!(
            metric = %definition.name,
            fact_model = %fact_model.name,
            aggregate = %aggregate,
            dimensions = dimensions.len(),
            "built metric"
        );

        Ok(Self {
            name: definition.name,
            fact_model: fact_model.clone(),
            dimensions,
            aggregate,
            dimension_filter: definition.dimension_filter,
            metric_filter: definition.metric_filter,
            order_by_dimension: definition.order_by_dimension,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fact_model(&self) -> &FactModel {
        &self.fact_model
    }

    pub fn dimensions(&self) -> &[ReportingDimension] {
        &self.dimensions
    }

    pub fn aggregate(&self) -> Aggregate {
        self.aggregate
    }

    pub fn dimension_filter(&self) -> &BTreeMap<String, FilterValue> {
        &self.dimension_filter
    }

    pub fn metric_filter(&self) -> &MetricFilter {
        &self.metric_filter
    }

    pub fn order_by_dimension(&self) -> &[OrderByDimension] {
        &self.order_by_dimension
    }

    /// A report over this metric with default options.
    pub fn report(&self) -> Result<Report> {
        Report::new(self, ReportOptions::default())
    }
}
