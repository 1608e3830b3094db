//! Cross-backend build layer for cohort SQL compilation
//!
//! This crate holds the pieces of cohort compilation that have to work
//! identically against warehouses with incompatible naming rules and
//! temp-table semantics:
//!
//! - [`qualify`] renders multi-part table identifiers regardless of
//!   which naming segments (catalog/schema) a backend uses;
//! - [`resolve`] turns a logical table reference into a queryable
//!   handle by probing the connection's access paths in priority order;
//! - [`materialize`] persists a compiled query under a fresh name in a
//!   designated emulation schema and hands back a scoped resource whose
//!   release is explicit and deterministic;
//! - [`BuildContext`] ties a connection, schema locations, and
//!   [`BuildOptions`] together for one compilation request, and
//!   [`compile_codesets`] produces the codeset query that feeds the
//!   materializer.

mod codeset;
mod context;
mod materialize;
mod options;
mod qualify;
mod resolver;

pub use codeset::*;
pub use context::*;
pub use materialize::*;
pub use options::*;
pub use qualify::*;
pub use resolver::*;
