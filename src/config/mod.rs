//! Configuration module for active-reporting.
//!
//! Loads fact models and metric definitions from TOML, with environment
//! variable expansion.

mod settings;

pub use settings::{expand_env_vars, Settings, SettingsError};
