//! SQL function adapters.
//!
//! Adapters own the safety of the arguments they interpolate into SQL
//! fragments that cannot be expressed as bound parameters.

pub mod datetime;

pub use datetime::{
    is_valid_precision_unit, render_date_truncation, render_date_truncation_for,
    supported_precision_units, InvalidPrecisionError, PrecisionUnit,
};
