//! Rime: the value-and-schema layer of a table format's metadata.
//!
//! This crate re-exports the Rime crates under one roof and adds a few helpers shared by their
//! callers.

pub use logging::{default_env_filter, init_logging};
pub use rime_avro::BuildInfo;
pub use utils::{difference, max_of};
pub use {
    rime_avro as avro, rime_dtype as dtype, rime_error as error, rime_literal as literal,
};

mod logging;
mod utils;
