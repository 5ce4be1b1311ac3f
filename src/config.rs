//! Configuration loader and schema types.
//!
//! Settings come from an optional TOML file plus `TUNEBOX__*` environment
//! overrides; every field has a default.

mod load;
mod schema;

pub use schema::*;
