#![allow(dead_code)]

use active_reporting::model::{Catalog, DimensionDef, DimensionFilterDef, FactModel};
use sqlparser::dialect::{DuckDbDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

use active_reporting::Dialect;

pub fn post_fact_model() -> FactModel {
    FactModel::new("post", "posts")
        .association("creator", "user")
        .dimension("state")
        .association("created_on", "date_dimension")
        .datetime_dimension("created_at")
        .with_dimension_filter(DimensionFilterDef::new("some_filter", "creator_id"))
}

pub fn user_fact_model() -> FactModel {
    FactModel::new("user", "users").with_default_dimension_label("username")
}

pub fn date_dimension_fact_model() -> FactModel {
    FactModel::new("date_dimension", "date_dimensions")
        .with_default_dimension_label("date")
        .with_dimension_hierarchy(["date", "month", "year", "quarter"])
        .with_hierarchy_label("month", "month_str")
}

pub fn comment_fact_model() -> FactModel {
    FactModel::new("comment", "comments")
        .with_measure("score")
        .with_dimension(DimensionDef::association_on_key("post", "post", "id"))
}

pub fn catalog() -> Catalog {
    Catalog::new([
        post_fact_model(),
        user_fact_model(),
        date_dimension_fact_model(),
        comment_fact_model(),
    ])
    .expect("fixture catalog is valid")
}

pub fn assert_parses(sql: &str, dialect: Dialect) {
    let parser: Box<dyn sqlparser::dialect::Dialect> = match dialect {
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::DuckDb => Box::new(DuckDbDialect {}),
        Dialect::MySql => Box::new(MySqlDialect {}),
    };
    if let Err(e) = Parser::parse_sql(&*parser, sql) {
        panic!("Invalid SQL for {:?}: {}\nSQL: {}", dialect, e, sql);
    }
}
