//! Fact model declarations.
//!
//! A [`FactModel`] names a fact table and declares what reports may group
//! and filter it by. A [`Catalog`] holds a validated set of fact models so
//! associations between them can be resolved.

pub mod catalog;
pub mod dimension;
pub mod fact;
pub mod filter;
pub mod validation;

pub use catalog::Catalog;
pub use dimension::{DimensionDef, DimensionHierarchy, DimensionKind};
pub use fact::FactModel;
pub use filter::{DimensionFilterDef, FilterOperator, FilterValue};
pub use validation::{is_valid_identifier, is_valid_table_name, validate, ValidationError};
