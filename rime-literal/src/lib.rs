//! Typed constant values and the row model they are read from.
//!
//! A [`Literal`] is one primitive column value. [`LiteralSet`] collects distinct literals, and
//! [`Row`]s hold the (possibly nested, possibly null) values of a record, which an [`Accessor`]
//! extracts by position.

pub use accessor::*;
pub use literal::*;
pub use row::*;
pub use set::*;

mod accessor;
mod display;
mod literal;
mod row;
mod set;
