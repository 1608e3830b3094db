//! Backend capability surface
//!
//! Warehouse connections differ in naming conventions, temp-table
//! semantics, and which access paths they support at all. This crate
//! defines the small capability set the compiler consumes: direct table
//! lookup, ad-hoc query execution, and raw statement execution. A
//! backend exposing any subset is usable; a capability it lacks simply
//! returns [`BackendError::Unsupported`] and the caller falls through to
//! its next strategy.

mod connection;
mod scripted;

pub use connection::*;
pub use scripted::*;
