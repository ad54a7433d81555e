//! TOML-based configuration for active-reporting.
//!
//! Supports a config file (reporting.toml) with environment variable
//! expansion in table names.
//!
//! Example configuration:
//! ```toml
//! dialect = "postgres"
//!
//! [[fact_models]]
//! name = "post"
//! table = "${REPORTING_SCHEMA}.posts"
//! dimensions = [
//!     { name = "state", type = "column" },
//!     { name = "created_at", type = "datetime" },
//!     { name = "creator", type = "association", fact_model = "user" },
//! ]
//!
//! [[fact_models]]
//! name = "user"
//! table = "users"
//! default_dimension_label = "username"
//!
//! [[metrics]]
//! name = "posts_by_creator"
//! fact_model = "post"
//! dimensions = ["creator", { name = "created_at", label = "month" }]
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ReportingError;
use crate::metric::{Metric, MetricDefinition};
use crate::model::{Catalog, FactModel};
use crate::sql::Dialect;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Metric not found: {0}")]
    MetricNotFound(String),

    #[error(transparent)]
    Reporting(#[from] ReportingError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Dialect reports render for unless overridden.
    pub dialect: Dialect,

    /// Fact model declarations.
    pub fact_models: Vec<FactModel>,

    /// Named metric definitions.
    pub metrics: Vec<MetricDefinition>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse settings and expand environment variables in table names.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = toml::from_str(content)?;
        for fact_model in &mut settings.fact_models {
            fact_model.table = expand_env_vars(&fact_model.table)?;
        }
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `REPORTING_CONFIG`
    /// 2. `./reporting.toml`
    /// 3. `~/.config/active-reporting/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("REPORTING_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("reporting.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("active-reporting").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Validate the declared fact models into a catalog.
    pub fn catalog(&self) -> crate::Result<Catalog> {
        Catalog::new(self.fact_models.iter().cloned())
    }

    /// Get a metric definition by name.
    pub fn metric_definition(&self, name: &str) -> Result<&MetricDefinition, SettingsError> {
        self.metrics
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| SettingsError::MetricNotFound(name.to_string()))
    }

    /// Build the named metric against this file's catalog.
    pub fn metric(&self, name: &str) -> Result<Metric, SettingsError> {
        let definition = self.metric_definition(name)?.clone();
        let catalog = self.catalog()?;
        Ok(Metric::new(definition, &catalog)?)
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
