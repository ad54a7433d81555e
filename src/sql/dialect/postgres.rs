//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features relevant to reports:
//! - ANSI identifier quoting (`"`)
//! - Native boolean type (true/false)
//! - `DATE_TRUNC(unit, timestamp)` for datetime drill-down

use super::helpers;
use super::SqlDialect;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn title(&self) -> &'static str {
        "Postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn supports_date_trunc(&self) -> bool {
        true
    }
}
