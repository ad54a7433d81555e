//! Validation of fact model declarations.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::dimension::DimensionKind;
use crate::model::FactModel;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Reference to undefined entity.
    UndefinedReference {
        entity_type: String,
        entity_name: String,
        reference_type: String,
        reference_name: String,
    },
    /// Invalid dimension hierarchy or hierarchy label.
    InvalidHierarchy {
        fact_model: String,
        issue: String,
    },
    /// Identifier that cannot be safely quoted into SQL.
    InvalidIdentifier {
        entity_type: String,
        entity_name: String,
        identifier: String,
    },
    /// Duplicate name detected.
    DuplicateName { entity_type: String, name: String },
    /// Association whose join alias is the fact table's own name.
    ShadowedTable {
        fact_model: String,
        dimension: String,
        table: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::UndefinedReference {
                entity_type,
                entity_name,
                reference_type,
                reference_name,
            } => {
                write!(
                    f,
                    "{} '{}' references undefined {} '{}'",
                    entity_type, entity_name, reference_type, reference_name
                )
            }
            ValidationError::InvalidHierarchy { fact_model, issue } => {
                write!(
                    f,
                    "fact model '{}' has invalid dimension hierarchy: {}",
                    fact_model, issue
                )
            }
            ValidationError::InvalidIdentifier {
                entity_type,
                entity_name,
                identifier,
            } => {
                write!(
                    f,
                    "{} '{}' has invalid identifier '{}'",
                    entity_type, entity_name, identifier
                )
            }
            ValidationError::DuplicateName { entity_type, name } => {
                write!(f, "Duplicate {} name: '{}'", entity_type, name)
            }
            ValidationError::ShadowedTable {
                fact_model,
                dimension,
                table,
            } => {
                write!(
                    f,
                    "dimension '{}.{}' joins under the name of its fact table '{}'",
                    fact_model, dimension, table
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Whether `ident` is a plain SQL identifier.
pub fn is_valid_identifier(ident: &str) -> bool {
    IDENTIFIER.is_match(ident)
}

/// Whether `table` is an identifier, optionally prefixed by one schema.
pub fn is_valid_table_name(table: &str) -> bool {
    match table.split_once('.') {
        Some((schema, name)) => is_valid_identifier(schema) && is_valid_identifier(name),
        None => is_valid_identifier(table),
    }
}

/// Validate a set of fact models, collecting every problem.
pub fn validate(models: &[FactModel]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_unique_names(models, &mut errors);
    validate_identifiers(models, &mut errors);
    validate_references(models, &mut errors);
    validate_join_aliases(models, &mut errors);
    validate_hierarchies(models, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_names(models: &[FactModel], errors: &mut Vec<ValidationError>) {
    let mut seen_models = HashSet::new();
    for model in models {
        if !seen_models.insert(model.name.as_str()) {
            errors.push(ValidationError::DuplicateName {
                entity_type: "fact model".to_string(),
                name: model.name.clone(),
            });
        }

        let mut seen_dimensions = HashSet::new();
        for dimension in &model.dimensions {
            if !seen_dimensions.insert(dimension.name.as_str()) {
                errors.push(ValidationError::DuplicateName {
                    entity_type: "dimension".to_string(),
                    name: format!("{}.{}", model.name, dimension.name),
                });
            }
        }

        let mut seen_filters = HashSet::new();
        for filter in &model.dimension_filters {
            if !seen_filters.insert(filter.name.as_str()) {
                errors.push(ValidationError::DuplicateName {
                    entity_type: "dimension filter".to_string(),
                    name: format!("{}.{}", model.name, filter.name),
                });
            }
        }
    }
}

fn validate_identifiers(models: &[FactModel], errors: &mut Vec<ValidationError>) {
    for model in models {
        let mut check = |entity_type: &str, entity_name: &str, ident: &str| {
            if !is_valid_identifier(ident) {
                errors.push(ValidationError::InvalidIdentifier {
                    entity_type: entity_type.to_string(),
                    entity_name: entity_name.to_string(),
                    identifier: ident.to_string(),
                });
            }
        };

        check("fact model", &model.name, &model.name);
        check("fact model", &model.name, &model.primary_key);
        if let Some(measure) = &model.measure {
            check("fact model", &model.name, measure);
        }
        if let Some(label) = &model.default_dimension_label {
            check("fact model", &model.name, label);
        }
        for column in model.hierarchy_labels.values() {
            check("fact model", &model.name, column);
        }
        if let Some(hierarchy) = &model.dimension_hierarchy {
            for level in hierarchy.levels() {
                check("fact model", &model.name, level);
            }
        }

        for dimension in &model.dimensions {
            check("dimension", &dimension.name, &dimension.name);
            check("dimension", &dimension.name, &dimension.fact_column());
            if let DimensionKind::Association {
                primary_key: Some(primary_key),
                ..
            } = &dimension.kind
            {
                check("dimension", &dimension.name, primary_key);
            }
        }

        for filter in &model.dimension_filters {
            check("dimension filter", &filter.name, &filter.column);
        }

        if !is_valid_table_name(&model.table) {
            errors.push(ValidationError::InvalidIdentifier {
                entity_type: "fact model".to_string(),
                entity_name: model.name.clone(),
                identifier: model.table.clone(),
            });
        }
    }
}

fn validate_references(models: &[FactModel], errors: &mut Vec<ValidationError>) {
    let by_name: HashMap<&str, &FactModel> =
        models.iter().map(|m| (m.name.as_str(), m)).collect();

    for model in models {
        for dimension in &model.dimensions {
            if let Some(target) = dimension.associated_model() {
                if !by_name.contains_key(target) {
                    errors.push(ValidationError::UndefinedReference {
                        entity_type: "dimension".to_string(),
                        entity_name: format!("{}.{}", model.name, dimension.name),
                        reference_type: "fact model".to_string(),
                        reference_name: target.to_string(),
                    });
                }
            }
        }
    }
}

fn validate_join_aliases(models: &[FactModel], errors: &mut Vec<ValidationError>) {
    for model in models {
        let table = model.table.rsplit('.').next().unwrap_or(&model.table);
        for dimension in &model.dimensions {
            if dimension.associated_model().is_some() && dimension.name == table {
                errors.push(ValidationError::ShadowedTable {
                    fact_model: model.name.clone(),
                    dimension: dimension.name.clone(),
                    table: model.table.clone(),
                });
            }
        }
    }
}

fn validate_hierarchies(models: &[FactModel], errors: &mut Vec<ValidationError>) {
    for model in models {
        let Some(hierarchy) = &model.dimension_hierarchy else {
            for level in model.hierarchy_labels.keys() {
                errors.push(ValidationError::InvalidHierarchy {
                    fact_model: model.name.clone(),
                    issue: format!("label for level '{}' without a hierarchy", level),
                });
            }
            continue;
        };

        if hierarchy.is_empty() {
            errors.push(ValidationError::InvalidHierarchy {
                fact_model: model.name.clone(),
                issue: "hierarchy has no levels".to_string(),
            });
        }
        if let Some(level) = hierarchy.duplicate_level() {
            errors.push(ValidationError::InvalidHierarchy {
                fact_model: model.name.clone(),
                issue: format!("level '{}' appears more than once", level),
            });
        }
        for level in model.hierarchy_labels.keys() {
            if !hierarchy.contains(level) {
                errors.push(ValidationError::InvalidHierarchy {
                    fact_model: model.name.clone(),
                    issue: format!("label for unknown level '{}'", level),
                });
            }
        }
    }
}
