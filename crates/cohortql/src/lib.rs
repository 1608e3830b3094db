//! Clinical cohort definitions compiled to cross-backend SQL
//!
//! This crate ties together:
//! - a typed object model for declarative cohort definitions
//!   (inclusion/exclusion criteria over concept sets and ranges);
//! - a backend capability surface abstracting warehouses with
//!   incompatible naming conventions and temp-table semantics;
//! - the build layer that qualifies identifiers, resolves tables by
//!   capability probing, and materializes derived results into a
//!   temp-emulation schema with deterministic cleanup.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cohortql::backend::ScriptedBackend;
//! use cohortql::build::{BuildContext, BuildOptions, compile_codesets};
//! use cohortql::defs::parse_cohort_definition;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let definition = parse_cohort_definition(r#"{
//!     "ConceptSets": [],
//!     "PrimaryCriteria": { "CriteriaList": [] }
//! }"#)?;
//!
//! let ctx = BuildContext::new(
//!     Arc::new(ScriptedBackend::new()),
//!     BuildOptions::new().with_temp_emulation_schema("scratch"),
//! )
//! .with_cdm_schema("cdm");
//!
//! let codesets = compile_codesets(&ctx, &definition.concept_sets);
//! let resource = ctx.materialize(&codesets)?;
//! // ... query through resource.handle() ...
//! resource.cleanup()?;
//! # Ok(())
//! # }
//! ```

// Re-export all public APIs from internal crates
pub use cohortql_backend as backend;
pub use cohortql_build as build;
pub use cohortql_defs as defs;

// Convenience re-exports
pub use cohortql_backend::{Backend, BackendError, TableHandle};
pub use cohortql_build::{
    BuildContext, BuildOptions, CodesetQuery, MaterializedResource, compile_codesets, materialize,
    qualify, resolve,
};
pub use cohortql_defs::{CohortExpression, ConceptSet, parse_cohort_definition};
