//! DuckDB SQL dialect.
//!
//! DuckDB is PostgreSQL-compatible for everything a report emits:
//! - ANSI identifier quoting (`"`)
//! - `DATE_TRUNC` with the same precision names as PostgreSQL

use super::helpers;
use super::SqlDialect;

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn title(&self) -> &'static str {
        "DuckDB"
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
