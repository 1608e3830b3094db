//! Cohort definition object model
//!
//! This crate defines the typed object model for declarative cohort
//! definitions: concept sets, inclusion/exclusion criteria, criteria
//! groups, and the numeric/date/text range filters they use. The model
//! mirrors the OHDSI-style JSON wire format and deserializes directly
//! from it; validation and SQL generation for individual criteria live
//! elsewhere.

mod cohort;
mod concept_set;
mod criteria;
mod tables;

pub use cohort::*;
pub use concept_set::*;
pub use criteria::*;
pub use tables::*;

use thiserror::Error;

/// Result type for definition parsing
pub type DefsResult<T> = Result<T, DefsError>;

/// Errors raised while reading a cohort definition document
#[derive(Debug, Error)]
pub enum DefsError {
    /// The JSON document could not be deserialized into the object model
    #[error("invalid cohort definition: {0}")]
    InvalidDefinition(#[from] serde_json::Error),
}

/// Parse a cohort definition from its JSON wire form
pub fn parse_cohort_definition(json: &str) -> DefsResult<CohortExpression> {
    Ok(serde_json::from_str(json)?)
}
