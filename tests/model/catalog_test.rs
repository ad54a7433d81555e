#[path = "../common/mod.rs"]
mod common;

use active_reporting::model::{Catalog, DimensionFilterDef, FactModel, ValidationError};
use active_reporting::ReportingError;

fn validation_errors(models: Vec<FactModel>) -> Vec<ValidationError> {
    match Catalog::new(models) {
        Err(ReportingError::InvalidCatalog(errors)) => errors,
        other => panic!("expected an invalid catalog, got {:?}", other),
    }
}

#[test]
fn test_fixture_catalog() {
    let catalog = common::catalog();
    assert_eq!(catalog.len(), 4);
    assert_eq!(
        catalog.names().collect::<Vec<_>>(),
        vec!["comment", "date_dimension", "post", "user"]
    );
    assert_eq!(catalog.fact_model("user").unwrap().table, "users");
}

#[test]
fn test_unknown_fact_model() {
    assert_eq!(
        common::catalog().fact_model("invoice").unwrap_err(),
        ReportingError::UnknownFactModel("invoice".into())
    );
}

#[test]
fn test_undefined_association_target() {
    let errors = validation_errors(vec![common::post_fact_model(), common::user_fact_model()]);
    assert_eq!(
        errors,
        vec![ValidationError::UndefinedReference {
            entity_type: "dimension".into(),
            entity_name: "post.created_on".into(),
            reference_type: "fact model".into(),
            reference_name: "date_dimension".into(),
        }]
    );
    assert_eq!(
        errors[0].to_string(),
        "dimension 'post.created_on' references undefined fact model 'date_dimension'"
    );
}

#[test]
fn test_rejects_unsafe_identifiers() {
    let errors = validation_errors(vec![
        FactModel::new("user", "users\"; DROP TABLE users; --"),
        FactModel::new("post", "posts")
            .dimension("state")
            .with_dimension_filter(DimensionFilterDef::new("f", "a b")),
        FactModel::new("tag", "tags").with_default_dimension_label("name)"),
    ]);
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|e| matches!(e, ValidationError::InvalidIdentifier { .. })));
}

#[test]
fn test_schema_qualified_table_is_accepted() {
    let catalog = Catalog::new([FactModel::new("post", "analytics.posts")]).unwrap();
    assert_eq!(catalog.fact_model("post").unwrap().table, "analytics.posts");
}

#[test]
fn test_hierarchy_problems() {
    let errors = validation_errors(vec![FactModel::new("date_dimension", "date_dimensions")
        .with_dimension_hierarchy(["date", "month", "month"])
        .with_hierarchy_label("week", "week_str")]);
    assert_eq!(
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec![
            "fact model 'date_dimension' has invalid dimension hierarchy: level 'month' appears more than once",
            "fact model 'date_dimension' has invalid dimension hierarchy: label for unknown level 'week'",
        ]
    );
}

#[test]
fn test_duplicate_names_reported_together() {
    let errors = validation_errors(vec![
        common::user_fact_model(),
        common::user_fact_model(),
        FactModel::new("post", "posts")
            .with_dimension_filter(DimensionFilterDef::new("f", "creator_id"))
            .with_dimension_filter(DimensionFilterDef::new("f", "state")),
    ]);
    assert_eq!(
        errors,
        vec![
            ValidationError::DuplicateName {
                entity_type: "fact model".into(),
                name: "user".into(),
            },
            ValidationError::DuplicateName {
                entity_type: "dimension filter".into(),
                name: "post.f".into(),
            },
        ]
    );
}

#[test]
fn test_association_cannot_shadow_fact_table() {
    let errors = validation_errors(vec![
        FactModel::new("post", "posts").association("users", "user"),
        FactModel::new("user", "users").association("users", "user"),
    ]);
    assert_eq!(
        errors,
        vec![ValidationError::ShadowedTable {
            fact_model: "user".into(),
            dimension: "users".into(),
            table: "users".into(),
        }]
    );
}
