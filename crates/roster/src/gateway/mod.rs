//! Gateways to the external text-generation service.

mod rule_generation;
mod validation;

pub use rule_generation::RuleGenerationGateway;
pub use validation::{RowValidator, ValidationError, ValidationGateway};
