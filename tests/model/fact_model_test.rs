#[path = "../common/mod.rs"]
mod common;

use active_reporting::model::{
    DimensionDef, DimensionFilterDef, DimensionKind, FactModel, FilterOperator, FilterValue,
};
use active_reporting::Dialect;

#[test]
fn test_builder_declares_dimensions_in_order() {
    let post = common::post_fact_model();
    let names: Vec<&str> = post.dimensions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["creator", "state", "created_on", "created_at"]);
    assert_eq!(post.primary_key, "id");
    assert_eq!(post.measure, None);
}

#[test]
fn test_association_defaults() {
    let post = common::post_fact_model();
    let creator = post.dimension_def("creator").unwrap();
    assert_eq!(creator.associated_model(), Some("user"));
    assert_eq!(creator.fact_column(), "creator_id");
    match &creator.kind {
        DimensionKind::Association { primary_key, .. } => assert_eq!(primary_key, &None),
        other => panic!("expected association, got {:?}", other),
    }
}

#[test]
fn test_hierarchy_navigation() {
    let dates = common::date_dimension_fact_model();
    let hierarchy = dates.dimension_hierarchy.as_ref().unwrap();
    assert_eq!(hierarchy.levels(), ["date", "month", "year", "quarter"]);
    assert_eq!(hierarchy.position("year"), Some(2));
    assert_eq!(hierarchy.roll_up("date"), Some("month"));
    assert_eq!(hierarchy.drill_down("quarter"), Some("year"));
    assert_eq!(dates.label_column("month"), "month_str");
    assert_eq!(dates.label_column("date"), "date");
}

#[test]
fn test_dimension_filter_lookup() {
    let post = common::post_fact_model();
    let filter = post.dimension_filter("some_filter").unwrap();
    assert_eq!(filter.column, "creator_id");
    assert_eq!(filter.operator, FilterOperator::Eq);
    assert!(post.dimension_filter("other").is_none());
}

#[test]
fn test_filter_expressions() {
    let between = DimensionFilterDef::new("min_score", "score").with_operator(FilterOperator::Gte);
    assert_eq!(
        between
            .to_expr("comments", &FilterValue::Float(2.5))
            .unwrap()
            .to_sql(Dialect::Postgres),
        "\"comments\".\"score\" >= 2.5"
    );

    let title = DimensionFilterDef::new("title", "title").with_operator(FilterOperator::Like);
    assert_eq!(
        title
            .to_expr("posts", &"Rust%".into())
            .unwrap()
            .to_sql(Dialect::MySql),
        "`posts`.`title` LIKE 'Rust%'"
    );

    let ids = DimensionFilterDef::new("ids", "id").with_operator(FilterOperator::In);
    assert_eq!(
        ids.to_expr("posts", &FilterValue::List(vec![]))
            .unwrap()
            .to_sql(Dialect::Postgres),
        "FALSE"
    );
}

#[test]
fn test_deserialize_from_toml() {
    let model: FactModel = toml::from_str(
        r#"
name = "date_dimension"
table = "date_dimensions"
default_dimension_label = "date"
dimension_hierarchy = ["date", "month", "year", "quarter"]

[hierarchy_labels]
month = "month_str"
"#,
    )
    .unwrap();
    assert_eq!(model, common::date_dimension_fact_model());
}

#[test]
fn test_deserialize_dimensions_and_filters() {
    let model: FactModel = toml::from_str(
        r#"
name = "post"
table = "posts"
dimensions = [
    { name = "creator", type = "association", fact_model = "user" },
    { name = "state", type = "column" },
    { name = "created_on", type = "association", fact_model = "date_dimension" },
    { name = "created_at", type = "datetime" },
]
dimension_filters = [{ name = "some_filter", column = "creator_id" }]
"#,
    )
    .unwrap();
    assert_eq!(model, common::post_fact_model());
}

#[test]
fn test_physical_column_override() {
    let model = FactModel::new("post", "posts")
        .with_dimension(DimensionDef::column("status").on("state"))
        .with_dimension(DimensionDef::association("author", "user").on("creator_id"));
    assert_eq!(model.dimension_def("status").unwrap().fact_column(), "state");
    assert_eq!(model.dimension_def("author").unwrap().fact_column(), "creator_id");
}
