//! Scheduling rules: the record model, the session rule list and the
//! authoring form.

mod book;
mod builder;
mod rule;

pub use book::RuleBook;
pub use builder::{split_task_list, RuleBuilder};
pub use rule::{Rule, RuleKind, RuleType};
