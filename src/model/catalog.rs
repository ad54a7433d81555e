// src/model/catalog.rs
use std::collections::BTreeMap;

use crate::error::{ReportingError, Result};
use crate::model::{validation, FactModel};

/// Validated registry of fact models, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    fact_models: BTreeMap<String, FactModel>,
}

impl Catalog {
    /// Validate `models` and build a catalog from them.
    ///
    /// Every problem is reported at once through
    /// [`ReportingError::InvalidCatalog`].
    pub fn new(models: impl IntoIterator<Item = FactModel>) -> Result<Self> {
        let models: Vec<FactModel> = models.into_iter().collect();
        validation::validate(&models).map_err(ReportingError::InvalidCatalog)?;

        Ok(Self {
            fact_models: models.into_iter().map(|m| (m.name.clone(), m)).collect(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&FactModel> {
        self.fact_models.get(name)
    }

    /// Look up a fact model, failing with [`ReportingError::UnknownFactModel`].
    pub fn fact_model(&self, name: &str) -> Result<&FactModel> {
        self.get(name)
            .ok_or_else(|| ReportingError::UnknownFactModel(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FactModel> {
        self.fact_models.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fact_models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fact_models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fact_models.is_empty()
    }
}
