#[path = "../common/mod.rs"]
mod common;

use active_reporting::metric::{DimensionRequest, Metric, MetricDefinition, MetricFilter, SortDirection};
use active_reporting::model::{DimensionDef, FilterValue};
use active_reporting::report::{Report, ReportOptions};
use active_reporting::{Dialect, ReportingError};

fn metric(definition: MetricDefinition) -> Metric {
    Metric::new(definition, &common::catalog()).unwrap()
}

fn render(report: &Report, dialect: Dialect) -> String {
    let sql = report.to_sql(dialect).unwrap();
    common::assert_parses(&sql, dialect);
    sql
}

#[test]
fn test_column_dimension_postgres() {
    let report = metric(MetricDefinition::new("a_metric", "post").dimension("state"))
        .report()
        .unwrap();
    insta::assert_snapshot!(render(&report, Dialect::Postgres), @r#"
SELECT
  "posts"."state" AS "state",
  COUNT(*) AS "a_metric"
FROM "posts"
GROUP BY "posts"."state"
"#);
}

#[test]
fn test_column_dimension_mysql() {
    let report = metric(MetricDefinition::new("a_metric", "post").dimension("state"))
        .report()
        .unwrap();
    insta::assert_snapshot!(render(&report, Dialect::MySql), @r"
SELECT
  `posts`.`state` AS `state`,
  COUNT(*) AS `a_metric`
FROM `posts`
GROUP BY `posts`.`state`
");
}

#[test]
fn test_no_dimensions_has_no_group_by() {
    let report = metric(MetricDefinition::new("total", "post")).report().unwrap();
    insta::assert_snapshot!(render(&report, Dialect::DuckDb), @r#"
SELECT
  COUNT(*) AS "total"
FROM "posts"
"#);
}

#[test]
fn test_datetime_dimension() {
    let report = metric(
        MetricDefinition::new("posts_per_day", "post")
            .dimension(DimensionRequest::labeled("created_at", "day")),
    )
    .report()
    .unwrap();
    assert_eq!(report.columns(), vec!["created_at_day", "posts_per_day"]);
    insta::assert_snapshot!(render(&report, Dialect::Postgres), @r#"
SELECT
  DATE_TRUNC('day', "posts"."created_at") AS "created_at_day",
  COUNT(*) AS "posts_per_day"
FROM "posts"
GROUP BY DATE_TRUNC('day', "posts"."created_at")
"#);
}

#[test]
fn test_datetime_dimension_unsupported_on_mysql() {
    let report = metric(
        MetricDefinition::new("posts_per_day", "post")
            .dimension(DimensionRequest::labeled("created_at", "day")),
    )
    .report()
    .unwrap();
    assert_eq!(
        report.to_sql(Dialect::MySql).unwrap_err(),
        ReportingError::UnsupportedDateTruncation(Dialect::MySql)
    );
}

#[test]
fn test_associations_with_identifiers_filters_and_ordering() {
    let metric = metric(
        MetricDefinition::new("a_metric", "post")
            .dimension("creator")
            .dimension(DimensionRequest::labeled("created_on", "month"))
            .with_metric_filter(MetricFilter {
                gt: Some(1.0),
                ..Default::default()
            })
            .order_by("created_on", SortDirection::Desc),
    );
    let report = Report::new(
        &metric,
        ReportOptions::default()
            .with_dimension_identifiers(true)
            .with_dimension_filter("some_filter", 7_i64)
            .with_limit(10),
    )
    .unwrap();

    assert_eq!(
        report.columns(),
        vec![
            "creator",
            "created_on",
            "creator_identifier",
            "created_on_identifier",
            "a_metric"
        ]
    );
    insta::assert_snapshot!(render(&report, Dialect::Postgres), @r#"
SELECT
  "creator"."username" AS "creator",
  "created_on"."month_str" AS "created_on",
  "posts"."creator_id" AS "creator_identifier",
  "posts"."created_on_id" AS "created_on_identifier",
  COUNT(*) AS "a_metric"
FROM "posts"
INNER JOIN "users" AS "creator" ON "creator"."id" = "posts"."creator_id"
INNER JOIN "date_dimensions" AS "created_on" ON "created_on"."id" = "posts"."created_on_id"
WHERE "posts"."creator_id" = 7
GROUP BY "creator"."username", "created_on"."month_str", "created_on"."month", "posts"."creator_id", "posts"."created_on_id"
HAVING COUNT(*) > 1
ORDER BY "created_on"."month" DESC
LIMIT 10
"#);
}

#[test]
fn test_hierarchy_level_without_override() {
    let report = metric(
        MetricDefinition::new("a_metric", "post")
            .dimension(DimensionRequest::labeled("created_on", "year"))
            .order_by("created_on", SortDirection::Asc),
    )
    .report()
    .unwrap();
    insta::assert_snapshot!(render(&report, Dialect::Postgres), @r#"
SELECT
  "created_on"."year" AS "created_on",
  COUNT(*) AS "a_metric"
FROM "posts"
INNER JOIN "date_dimensions" AS "created_on" ON "created_on"."id" = "posts"."created_on_id"
GROUP BY "created_on"."year"
ORDER BY "created_on"."year" ASC
"#);
}

#[test]
fn test_measure_aggregate_with_schema_table() {
    let catalog = active_reporting::Catalog::new([
        active_reporting::FactModel::new("sale", "analytics.sales")
            .with_measure("total")
            .dimension("region"),
    ])
    .unwrap();
    let metric = Metric::new(
        MetricDefinition::new("revenue", "sale")
            .dimension("region")
            .with_aggregate("sum"),
        &catalog,
    )
    .unwrap();
    let report = metric.report().unwrap();
    insta::assert_snapshot!(render(&report, Dialect::DuckDb), @r#"
SELECT
  "analytics"."sales"."region" AS "region",
  SUM("analytics"."sales"."total") AS "revenue"
FROM "analytics"."sales"
GROUP BY "analytics"."sales"."region"
"#);
}

#[test]
fn test_report_filter_overrides_metric_filter() {
    let metric = metric(
        MetricDefinition::new("a_metric", "post")
            .dimension("state")
            .with_dimension_filter("some_filter", 1_i64),
    );
    let report = Report::new(
        &metric,
        ReportOptions::default().with_dimension_filter("some_filter", 2_i64),
    )
    .unwrap();
    assert_eq!(
        report.dimension_filter().get("some_filter"),
        Some(&FilterValue::Int(2))
    );
    assert!(render(&report, Dialect::Postgres).contains("WHERE \"posts\".\"creator_id\" = 2"));
}

#[test]
fn test_report_options_are_validated() {
    let metric = metric(MetricDefinition::new("a_metric", "post").dimension("state"));
    assert!(matches!(
        Report::new(&metric, ReportOptions::default().with_dimension_filter("nope", 1_i64)),
        Err(ReportingError::UnknownDimensionFilter { .. })
    ));
    assert!(matches!(
        Report::new(
            &metric,
            ReportOptions::default().with_metric_filter(MetricFilter {
                lt: Some(f64::INFINITY),
                ..Default::default()
            })
        ),
        Err(ReportingError::InvalidMetricFilter(_))
    ));
}

#[test]
fn test_string_filter_values_are_escaped() {
    let catalog = active_reporting::Catalog::new([active_reporting::FactModel::new("post", "posts")
        .dimension("state")
        .with_dimension_filter(active_reporting::model::DimensionFilterDef::new("state", "state"))])
    .unwrap();
    let metric = Metric::new(
        MetricDefinition::new("a_metric", "post")
            .dimension("state")
            .with_dimension_filter("state", "x' OR '1'='1"),
        &catalog,
    )
    .unwrap();
    let sql = render(&metric.report().unwrap(), Dialect::Postgres);
    assert!(sql.contains("WHERE \"posts\".\"state\" = 'x'' OR ''1''=''1'"));
}

#[test]
fn test_association_joins_on_target_primary_key() {
    let catalog = active_reporting::Catalog::new([
        active_reporting::FactModel::new("post", "posts")
            .association("creator", "user")
            .with_dimension(DimensionDef::association_on_key("editor", "user", "legacy_id")),
        active_reporting::FactModel::new("user", "users")
            .with_primary_key("user_id")
            .with_default_dimension_label("username"),
    ])
    .unwrap();
    let metric = Metric::new(
        MetricDefinition::new("a_metric", "post")
            .dimension("creator")
            .dimension("editor"),
        &catalog,
    )
    .unwrap();
    insta::assert_snapshot!(render(&metric.report().unwrap(), Dialect::Postgres), @r#"
SELECT
  "creator"."username" AS "creator",
  "editor"."username" AS "editor",
  COUNT(*) AS "a_metric"
FROM "posts"
INNER JOIN "users" AS "creator" ON "creator"."user_id" = "posts"."creator_id"
INNER JOIN "users" AS "editor" ON "editor"."legacy_id" = "posts"."editor_id"
GROUP BY "creator"."username", "editor"."username"
"#);
}

#[test]
fn test_mixed_case_datetime_column_is_quoted() {
    let catalog = active_reporting::Catalog::new([active_reporting::FactModel::new("post", "posts")
        .dimension("createdAt")
        .with_dimension(DimensionDef::datetime("created").on("createdAt"))])
    .unwrap();
    let metric = Metric::new(
        MetricDefinition::new("a_metric", "post")
            .dimension("createdAt")
            .dimension(DimensionRequest::labeled("created", "week")),
        &catalog,
    )
    .unwrap();
    insta::assert_snapshot!(render(&metric.report().unwrap(), Dialect::DuckDb), @r#"
SELECT
  "posts"."createdAt" AS "createdAt",
  DATE_TRUNC('week', "posts"."createdAt") AS "created_week",
  COUNT(*) AS "a_metric"
FROM "posts"
GROUP BY "posts"."createdAt", DATE_TRUNC('week', "posts"."createdAt")
"#);
}

#[test]
fn test_identifier_column_collision_is_rejected() {
    let catalog = active_reporting::Catalog::new([
        active_reporting::FactModel::new("post", "posts")
            .association("creator", "user")
            .dimension("creator_identifier"),
        common::user_fact_model(),
    ])
    .unwrap();
    let metric = Metric::new(
        MetricDefinition::new("a_metric", "post")
            .dimension("creator")
            .dimension("creator_identifier"),
        &catalog,
    )
    .unwrap();
    assert!(metric.report().is_ok());
    assert_eq!(
        Report::new(&metric, ReportOptions::default().with_dimension_identifiers(true))
            .unwrap_err(),
        ReportingError::DuplicateColumn("creator_identifier".into())
    );
}
