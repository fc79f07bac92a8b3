//! API request handlers.

mod datasets;
mod export;
mod rules;
mod validate;

pub use datasets::*;
pub use export::*;
pub use rules::*;
pub use validate::*;
