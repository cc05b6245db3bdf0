//! Strata turns entity metadata, schemas and criteria into statement plans and renders them as
//! SQL text for a dialect.
//!
//! The plans are built by the access contexts (`SelectContext`, `InsertContext`, ...) through
//! `StatementBuilder::build` and written by a `SqlWriter`, `GenericSqlWriter` being the default
//! dialect. Engine specific writers live in their own crates.
pub use strata_core::*;
