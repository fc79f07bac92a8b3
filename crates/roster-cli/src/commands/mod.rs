//! CLI command implementations.

pub mod rule;
pub mod serve;
pub mod validate;
