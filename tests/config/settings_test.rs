#[path = "../common/mod.rs"]
mod common;

use std::env;
use std::fs;

use active_reporting::config::{Settings, SettingsError};
use active_reporting::{Dialect, ReportingError};

const REPORTING_TOML: &str = r#"
dialect = "duckdb"

[[fact_models]]
name = "post"
table = "${AR_SETTINGS_SCHEMA}.posts"
dimensions = [
    { name = "creator", type = "association", fact_model = "user" },
    { name = "state", type = "column" },
]
dimension_filters = [{ name = "some_filter", column = "creator_id" }]

[[fact_models]]
name = "user"
table = "users"
default_dimension_label = "username"

[[metrics]]
name = "posts_by_creator"
fact_model = "post"
dimensions = ["creator"]
dimension_filter = { some_filter = 3 }

[[metrics]]
name = "broken"
fact_model = "post"
dimensions = ["title"]
"#;

#[test]
fn test_parse_and_render_metric() {
    env::set_var("AR_SETTINGS_SCHEMA", "analytics");
    let settings = Settings::from_toml_str(REPORTING_TOML).unwrap();
    env::remove_var("AR_SETTINGS_SCHEMA");

    assert_eq!(settings.dialect, Dialect::DuckDb);
    assert_eq!(settings.fact_models[0].table, "analytics.posts");
    assert_eq!(settings.metrics.len(), 2);

    let metric = settings.metric("posts_by_creator").unwrap();
    let sql = metric.report().unwrap().to_sql(settings.dialect).unwrap();
    common::assert_parses(&sql, settings.dialect);
    insta::assert_snapshot!(sql, @r#"
SELECT
  "creator"."username" AS "creator",
  COUNT(*) AS "posts_by_creator"
FROM "analytics"."posts"
INNER JOIN "users" AS "creator" ON "creator"."id" = "analytics"."posts"."creator_id"
WHERE "analytics"."posts"."creator_id" = 3
GROUP BY "creator"."username"
"#);
}

#[test]
fn test_invalid_metric_surfaces_reporting_error() {
    env::set_var("AR_SETTINGS_SCHEMA_2", "public");
    let settings =
        Settings::from_toml_str(&REPORTING_TOML.replace("AR_SETTINGS_SCHEMA", "AR_SETTINGS_SCHEMA_2"))
            .unwrap();
    env::remove_var("AR_SETTINGS_SCHEMA_2");

    let err = settings.metric("broken").unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Reporting(ReportingError::UnknownDimension { ref dimension, .. }) if dimension == "title"
    ));
    assert!(matches!(
        settings.metric("absent"),
        Err(SettingsError::MetricNotFound(_))
    ));
}

#[test]
fn test_missing_env_var() {
    let err = Settings::from_toml_str(
        &REPORTING_TOML.replace("AR_SETTINGS_SCHEMA", "AR_SETTINGS_SCHEMA_UNSET_98765"),
    )
    .unwrap_err();
    assert!(
        matches!(err, SettingsError::MissingEnvVar(ref name) if name == "AR_SETTINGS_SCHEMA_UNSET_98765")
    );
}

#[test]
fn test_from_file() {
    let path = env::temp_dir().join(format!("active-reporting-{}.toml", std::process::id()));
    fs::write(
        &path,
        r#"
[[fact_models]]
name = "user"
table = "users"
"#,
    )
    .unwrap();

    let settings = Settings::from_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(settings.dialect, Dialect::Postgres);
    assert_eq!(settings.catalog().unwrap().len(), 1);
}

#[test]
fn test_file_not_found() {
    let err = Settings::from_file("/nonexistent/reporting.toml").unwrap_err();
    assert!(matches!(err, SettingsError::FileNotFound(_)));
}

#[test]
fn test_parse_error() {
    let err = Settings::from_toml_str("dialect = \"oracle\"").unwrap_err();
    assert!(matches!(err, SettingsError::ParseError(_)));
}

#[test]
fn test_invalid_catalog() {
    let settings = Settings::from_toml_str(
        r#"
[[fact_models]]
name = "post"
table = "posts"
dimensions = [{ name = "creator", type = "association", fact_model = "user" }]
"#,
    )
    .unwrap();
    assert!(matches!(
        settings.catalog(),
        Err(ReportingError::InvalidCatalog(ref errors)) if errors.len() == 1
    ));
}
