//! Runtime helpers shared by the catalog workspace crates.

pub mod env;
pub mod utils;
