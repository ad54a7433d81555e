// src/model/fact.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ReportingError, Result};
use crate::model::dimension::{DimensionDef, DimensionHierarchy};
use crate::model::filter::{DimensionFilterDef, FilterValue};
use crate::sql::expr::qualified_table_tokens;
use crate::sql::Dialect;

fn default_primary_key() -> String {
    "id".to_string()
}

/// A fact table plus the dimensions, labels and filters reports may use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactModel {
    pub name: String,
    /// Physical table, optionally `schema.table`.
    pub table: String,
    /// Key association dimensions on other models join to.
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    /// Column aggregated by `sum`, `max`, `min` and `avg`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure: Option<String>,
    #[serde(default)]
    pub dimensions: Vec<DimensionDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension_hierarchy: Option<DimensionHierarchy>,
    /// Column used to label this model when another model reports on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dimension_label: Option<String>,
    /// Hierarchy level -> display column, e.g. `month` -> `month_str`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hierarchy_labels: BTreeMap<String, String>,
    #[serde(default)]
    pub dimension_filters: Vec<DimensionFilterDef>,
}

impl FactModel {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            primary_key: default_primary_key(),
            measure: None,
            dimensions: Vec::new(),
            dimension_hierarchy: None,
            default_dimension_label: None,
            hierarchy_labels: BTreeMap::new(),
            dimension_filters: Vec::new(),
        }
    }

    pub fn with_primary_key(mut self, key: impl Into<String>) -> Self {
        self.primary_key = key.into();
        self
    }

    pub fn with_measure(mut self, column: impl Into<String>) -> Self {
        self.measure = Some(column.into());
        self
    }

    /// Add a column dimension reading the column of the same name.
    pub fn dimension(self, name: impl Into<String>) -> Self {
        self.with_dimension(DimensionDef::column(name))
    }

    pub fn datetime_dimension(self, name: impl Into<String>) -> Self {
        self.with_dimension(DimensionDef::datetime(name))
    }

    /// Add an association dimension joined through `<name>_id`.
    pub fn association(self, name: impl Into<String>, fact_model: impl Into<String>) -> Self {
        self.with_dimension(DimensionDef::association(name, fact_model))
    }

    pub fn with_dimension(mut self, dimension: DimensionDef) -> Self {
        self.dimensions.push(dimension);
        self
    }

    pub fn with_dimension_hierarchy<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimension_hierarchy = Some(DimensionHierarchy::new(levels));
        self
    }

    pub fn with_default_dimension_label(mut self, label: impl Into<String>) -> Self {
        self.default_dimension_label = Some(label.into());
        self
    }

    pub fn with_hierarchy_label(
        mut self,
        level: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        self.hierarchy_labels.insert(level.into(), column.into());
        self
    }

    pub fn with_dimension_filter(mut self, filter: DimensionFilterDef) -> Self {
        self.dimension_filters.push(filter);
        self
    }

    pub fn dimension_def(&self, name: &str) -> Option<&DimensionDef> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn dimension_filter(&self, name: &str) -> Option<&DimensionFilterDef> {
        self.dimension_filters.iter().find(|f| f.name == name)
    }

    /// Column displayed for `level`: the hierarchy label override, or the
    /// level itself.
    pub fn label_column<'a>(&'a self, level: &'a str) -> &'a str {
        self.hierarchy_labels
            .get(level)
            .map(String::as_str)
            .unwrap_or(level)
    }

    /// Whether `label` may label this model in a report.
    pub fn accepts_label(&self, label: &str) -> bool {
        if self.default_dimension_label.as_deref() == Some(label) {
            return true;
        }
        match &self.dimension_hierarchy {
            Some(hierarchy) => hierarchy.contains(label),
            None => true,
        }
    }

    /// Table name quoted for `dialect`, one part at a time.
    pub fn quoted_table(&self, dialect: Dialect) -> String {
        qualified_table_tokens(&self.table).serialize(dialect)
    }

    /// Check every `name -> value` binding against the declared filters.
    pub fn check_dimension_filter(&self, bindings: &BTreeMap<String, FilterValue>) -> Result<()> {
        for (name, value) in bindings {
            let filter =
                self.dimension_filter(name)
                    .ok_or_else(|| ReportingError::UnknownDimensionFilter {
                        fact_model: self.name.clone(),
                        filter: name.clone(),
                    })?;
            filter.check_value(value)?;
        }
        Ok(())
    }
}
