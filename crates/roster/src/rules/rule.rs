//! Rule records.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

/// Discriminant of a rule, used by the builder to pick which fields apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleType {
    #[default]
    CoRun,
    SlotRestriction,
    LoadLimit,
}

impl RuleType {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RuleType::CoRun => "Co-Run",
            RuleType::SlotRestriction => "Slot Restriction",
            RuleType::LoadLimit => "Load Limit",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind-specific body of a rule. Serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuleKind {
    /// Tasks that must be scheduled together.
    CoRun { tasks: Vec<String> },

    /// Minimum number of slots a group must share.
    SlotRestriction {
        group: String,
        #[serde(rename = "minCommonSlots")]
        min_common_slots: i64,
    },

    /// Maximum task-slots a group may take within one phase.
    LoadLimit {
        group: String,
        #[serde(rename = "maxSlotsPerPhase")]
        max_slots_per_phase: i64,
    },
}

impl RuleKind {
    /// The discriminant of this rule.
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleKind::CoRun { .. } => RuleType::CoRun,
            RuleKind::SlotRestriction { .. } => RuleType::SlotRestriction,
            RuleKind::LoadLimit { .. } => RuleType::LoadLimit,
        }
    }

    /// Check that the fields required by this kind are meaningful.
    ///
    /// Co-run rules need at least two distinct, non-empty task identifiers.
    /// Group rules need a non-empty group name.
    pub fn validate(&self) -> Result<()> {
        match self {
            RuleKind::CoRun { tasks } => {
                if tasks.iter().any(|t| t.trim().is_empty()) {
                    return Err(RosterError::InvalidRule(
                        "coRun task identifiers must not be empty".to_string(),
                    ));
                }
                let distinct: HashSet<&str> = tasks.iter().map(|t| t.trim()).collect();
                if distinct.len() < 2 {
                    return Err(RosterError::InvalidRule(format!(
                        "coRun needs at least 2 distinct tasks, got {}",
                        distinct.len()
                    )));
                }
                Ok(())
            }
            RuleKind::SlotRestriction { group, .. } | RuleKind::LoadLimit { group, .. } => {
                if group.trim().is_empty() {
                    return Err(RosterError::InvalidRule(format!(
                        "{} needs a group name",
                        self.rule_type()
                    )));
                }
                Ok(())
            }
        }
    }
}

/// A rule with its priority. Lower priority values apply first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(flatten)]
    pub kind: RuleKind,
    pub priority: i64,
}

impl Rule {
    /// Create a new rule.
    pub fn new(kind: RuleKind, priority: i64) -> Self {
        Self { kind, priority }
    }

    /// The discriminant of this rule.
    pub fn rule_type(&self) -> RuleType {
        self.kind.rule_type()
    }
}
