//! Append-only rule list.

use serde::Serialize;

use super::rule::Rule;

/// The session's rules in insertion order.
///
/// Rules can only be appended. Export order comes from
/// [`RuleBook::sorted_by_priority`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RuleBook {
    rules: Vec<Rule>,
}

impl RuleBook {
    /// Create an empty rule book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule and return a reference to it.
    pub fn push(&mut self, rule: Rule) -> &Rule {
        tracing::debug!(rule_type = %rule.rule_type(), priority = rule.priority, "rule appended");
        self.rules.push(rule);
        &self.rules[self.rules.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in insertion order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Rules by ascending priority. Ties keep insertion order.
    pub fn sorted_by_priority(&self) -> Vec<Rule> {
        let mut sorted = self.rules.clone();
        sorted.sort_by_key(|rule| rule.priority);
        sorted
    }
}
