//! Avro support for Rime tables.
//!
//! [`to_avro_schema`] translates a flat logical [`rime_dtype::StructType`] into the physical
//! record schema its rows are stored with. [`avro_encode`] and [`AvroRecordWriter`] write rows into
//! a deflate-compressed Avro object container file carrying the table's `format-version`, and
//! [`AvroRecordReader`] reads them back.

pub use convert::{avro_to_literal, literal_to_avro};
pub use options::*;
pub use reader::*;
pub use schema::*;
pub use writer::*;

mod container;
mod convert;
mod options;
mod reader;
mod schema;
mod writer;
