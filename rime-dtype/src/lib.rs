#![deny(missing_docs)]

//! A logical type system for Rime tables
//!
//! This crate contains the type tree a table schema is described with: primitive logical types,
//! nested structs, lists and maps, the [`NestedField`]s that carry durable field-ids, and the
//! [`FieldPath`] selectors used to address (possibly nested) columns.

pub use decimal::*;
pub use dtype::*;
pub use field::*;
pub use nested::*;
pub use nullability::*;
pub use struct_::*;

mod decimal;
mod dtype;
mod field;
mod nested;
mod nullability;
mod struct_;
