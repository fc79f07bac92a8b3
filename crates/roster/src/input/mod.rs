//! Delimited-text upload parsing.

mod parser;
mod source;

pub use parser::Parser;
pub use source::ParsedTable;
