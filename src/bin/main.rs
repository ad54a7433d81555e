//! active-reporting CLI - Render metrics from a reporting.toml to SQL
//!
//! Usage:
//!   active-reporting sql <reporting.toml> --metric <name> [--dialect <dialect>]
//!   active-reporting list <reporting.toml> [--json]
//!   active-reporting validate <reporting.toml>
//!   active-reporting trunc <unit> <table> <column> [--dialect <dialect>]
//!   active-reporting units
//!
//! Examples:
//!   active-reporting sql reporting.toml --metric posts_by_state
//!   active-reporting sql reporting.toml --metric posts_by_state --filter some_filter=7 --limit 10
//!   active-reporting trunc month '"posts"' created_at

use active_reporting::config::Settings;
use active_reporting::functions::datetime::{render_date_truncation_for, supported_precision_units};
use active_reporting::model::FilterValue;
use active_reporting::report::{Report, ReportOptions};
use active_reporting::sql::Dialect;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "active-reporting")]
#[command(about = "Render fact model metrics to dialect-specific SQL")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a metric's report as SQL
    Sql {
        /// Path to the reporting.toml file
        file: PathBuf,

        /// Name of the metric to render
        #[arg(short, long)]
        metric: String,

        /// SQL dialect to generate (defaults to the file's dialect)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Select association keys as <dimension>_identifier columns
        #[arg(long)]
        identifiers: bool,

        /// Dimension filter binding, NAME=VALUE; VALUE is parsed as JSON, else a string
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, FilterValue)>,

        /// Maximum number of rows
        #[arg(short, long)]
        limit: Option<u64>,
    },

    /// List fact models and metrics in a reporting.toml
    List {
        /// Path to the reporting.toml file
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate fact models and metrics without generating SQL
    Validate {
        /// Path to the reporting.toml file
        file: PathBuf,
    },

    /// Render a single DATE_TRUNC expression
    Trunc {
        /// Precision unit (see `units`)
        unit: String,

        /// Qualified table name, already quoted
        table: String,

        /// Column name
        column: String,

        #[arg(short, long, default_value = "postgres")]
        dialect: DialectArg,
    },

    /// List supported precision units
    Units,
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Postgres,
    Duckdb,
    Mysql,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Mysql => Dialect::MySql,
        }
    }
}

fn parse_filter(raw: &str) -> Result<(String, FilterValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| FilterValue::String(value.into()));
    Ok((name.to_string(), value))
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sql {
            file,
            metric,
            dialect,
            identifiers,
            filters,
            limit,
        } => cmd_sql(file, &metric, dialect, identifiers, filters, limit),
        Commands::List { file, json } => cmd_list(file, json),
        Commands::Validate { file } => cmd_validate(file),
        Commands::Trunc {
            unit,
            table,
            column,
            dialect,
        } => cmd_trunc(&unit, &table, &column, dialect),
        Commands::Units => cmd_units(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_sql(
    file: PathBuf,
    metric: &str,
    dialect: Option<DialectArg>,
    identifiers: bool,
    filters: Vec<(String, FilterValue)>,
    limit: Option<u64>,
) -> CmdResult {
    let settings = Settings::from_file(&file)?;
    let dialect = dialect.map(Dialect::from).unwrap_or(settings.dialect);
    let metric = settings.metric(metric)?;

    let mut options = ReportOptions::default().with_dimension_identifiers(identifiers);
    for (name, value) in filters {
        options = options.with_dimension_filter(name, value);
    }
    if let Some(limit) = limit {
        options = options.with_limit(limit);
    }

    let report = Report::new(&metric, options)?;
    println!("{}", report.to_sql(dialect)?);
    Ok(())
}

fn cmd_list(file: PathBuf, json: bool) -> CmdResult {
    let settings = Settings::from_file(&file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    println!("Fact models in '{}':", file.display());
    for model in &settings.fact_models {
        println!("  - {} ({})", model.name, model.table);
        for dimension in &model.dimensions {
            println!("      {} [{}]", dimension.name, dimension.kind_name());
        }
    }

    println!("Metrics:");
    for metric in &settings.metrics {
        println!("  - {} ({} on {})", metric.name, metric.aggregate, metric.fact_model);
    }
    Ok(())
}

fn cmd_validate(file: PathBuf) -> CmdResult {
    let settings = Settings::from_file(&file)?;
    let catalog = settings.catalog()?;

    let mut failures = 0;
    for definition in &settings.metrics {
        if let Err(e) = active_reporting::Metric::new(definition.clone(), &catalog) {
            eprintln!("metric '{}': {}", definition.name, e);
            failures += 1;
        }
    }
    if failures > 0 {
        return Err(format!("{} invalid metric(s)", failures).into());
    }

    println!(
        "OK: {} is valid ({} fact models, {} metrics)",
        file.display(),
        catalog.len(),
        settings.metrics.len()
    );
    Ok(())
}

fn cmd_trunc(unit: &str, table: &str, column: &str, dialect: DialectArg) -> CmdResult {
    println!("{}", render_date_truncation_for(dialect.into(), unit, table, column)?);
    Ok(())
}

fn cmd_units() -> CmdResult {
    for unit in supported_precision_units() {
        println!("{}", unit);
    }
    Ok(())
}
