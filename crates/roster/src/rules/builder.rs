//! Form state for authoring rules by hand or from a generated answer.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

use super::book::RuleBook;
use super::rule::{Rule, RuleKind, RuleType};

const DEFAULT_PRIORITY: i64 = 1;
const DEFAULT_SLOTS: i64 = 1;

/// Rule builder form.
///
/// The selected [`RuleType`] decides which fields are read on submit. A
/// successful submit appends one rule and resets every kind-specific field
/// and the priority, so the next entry starts from defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleBuilder {
    /// Selected rule kind.
    #[serde(rename = "type")]
    pub kind: RuleType,
    /// Comma-separated task identifiers for co-run rules.
    pub co_run_tasks: String,
    pub slot_group: String,
    pub min_common_slots: i64,
    pub load_group: String,
    pub max_slots_per_phase: i64,
    /// Priority attached to the next rule.
    pub priority: i64,
    /// Free-text description sent to the rule generator.
    pub prompt: String,
}

impl Default for RuleBuilder {
    fn default() -> Self {
        Self {
            kind: RuleType::CoRun,
            co_run_tasks: String::new(),
            slot_group: String::new(),
            min_common_slots: DEFAULT_SLOTS,
            load_group: String::new(),
            max_slots_per_phase: DEFAULT_SLOTS,
            priority: DEFAULT_PRIORITY,
            prompt: String::new(),
        }
    }
}

impl RuleBuilder {
    /// Create a builder with default fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the form to another rule kind. Field values are kept.
    pub fn select_kind(&mut self, kind: RuleType) {
        self.kind = kind;
    }

    /// Build the rule described by the current fields without appending it.
    pub fn draft(&self) -> Result<Rule> {
        let kind = match self.kind {
            RuleType::CoRun => RuleKind::CoRun {
                tasks: split_task_list(&self.co_run_tasks),
            },
            RuleType::SlotRestriction => RuleKind::SlotRestriction {
                group: self.slot_group.trim().to_string(),
                min_common_slots: self.min_common_slots,
            },
            RuleType::LoadLimit => RuleKind::LoadLimit {
                group: self.load_group.trim().to_string(),
                max_slots_per_phase: self.max_slots_per_phase,
            },
        };
        kind.validate()?;
        Ok(Rule::new(kind, self.priority))
    }

    /// Append the drafted rule and reset the form.
    ///
    /// A rejected form appends nothing and keeps its fields.
    pub fn submit(&mut self, book: &mut RuleBook) -> Result<Rule> {
        let rule = self.draft()?;
        book.push(rule.clone());
        self.reset_fields();
        Ok(rule)
    }

    /// Append a generated rule with the current priority, then clear the
    /// prompt and reset the priority.
    pub fn accept_generated(&mut self, kind: RuleKind, book: &mut RuleBook) -> Result<Rule> {
        kind.validate()?;
        let rule = Rule::new(kind, self.priority);
        book.push(rule.clone());
        self.prompt.clear();
        self.priority = DEFAULT_PRIORITY;
        Ok(rule)
    }

    /// The prompt ready to send to the generator, if there is one.
    pub fn pending_prompt(&self) -> Result<&str> {
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(RosterError::InvalidRule("rule prompt is empty".to_string()));
        }
        Ok(prompt)
    }

    fn reset_fields(&mut self) {
        let prompt = std::mem::take(&mut self.prompt);
        *self = Self {
            kind: self.kind,
            prompt,
            ..Self::default()
        };
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_task_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_co_run_submit() {
        let mut book = RuleBook::new();
        let mut builder = RuleBuilder::new();
        builder.co_run_tasks = "T1, T2".to_string();
        builder.priority = 4;

        let rule = builder.submit(&mut book).unwrap();
        assert_eq!(
            rule,
            Rule::new(
                RuleKind::CoRun {
                    tasks: vec!["T1".into(), "T2".into()]
                },
                4
            )
        );
        assert_eq!(book.len(), 1);

        // Fields reset after add
        assert_eq!(builder.co_run_tasks, "");
        assert_eq!(builder.priority, 1);
        assert_eq!(builder.kind, RuleType::CoRun);
    }

    #[test]
    fn test_co_run_single_task_rejected() {
        let mut book = RuleBook::new();
        let mut builder = RuleBuilder::new();
        builder.co_run_tasks = "T1".to_string();
        builder.priority = 3;

        assert!(builder.submit(&mut book).is_err());
        assert!(book.is_empty());
        // Rejected form keeps its input
        assert_eq!(builder.co_run_tasks, "T1");
        assert_eq!(builder.priority, 3);
    }

    #[test]
    fn test_co_run_trailing_comma_is_not_a_task() {
        let mut book = RuleBook::new();
        let mut builder = RuleBuilder::new();
        builder.co_run_tasks = "T1,".to_string();
        assert!(builder.submit(&mut book).is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn test_group_rules_need_group() {
        let mut book = RuleBook::new();
        let mut builder = RuleBuilder::new();
        builder.select_kind(RuleType::SlotRestriction);
        builder.min_common_slots = 2;
        assert!(builder.submit(&mut book).is_err());

        builder.slot_group = "Sales".to_string();
        let rule = builder.submit(&mut book).unwrap();
        assert_eq!(
            rule.kind,
            RuleKind::SlotRestriction {
                group: "Sales".into(),
                min_common_slots: 2
            }
        );
        assert_eq!(builder.min_common_slots, 1);
        assert_eq!(builder.kind, RuleType::SlotRestriction);

        builder.select_kind(RuleType::LoadLimit);
        assert!(builder.submit(&mut book).is_err());
        builder.load_group = "Backend".to_string();
        builder.max_slots_per_phase = 3;
        builder.submit(&mut book).unwrap();
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_reset_clears_every_kind() {
        let mut book = RuleBook::new();
        let mut builder = RuleBuilder::new();
        builder.load_group = "Backend".to_string();
        builder.co_run_tasks = "T1,T2".to_string();
        builder.submit(&mut book).unwrap();
        assert_eq!(builder.load_group, "");
    }

    #[test]
    fn test_accept_generated() {
        let mut book = RuleBook::new();
        let mut builder = RuleBuilder::new();
        builder.prompt = "Limit Backend group to 3 tasks per phase".to_string();
        builder.priority = 2;

        let rule = builder
            .accept_generated(
                RuleKind::LoadLimit {
                    group: "Backend".into(),
                    max_slots_per_phase: 3,
                },
                &mut book,
            )
            .unwrap();

        assert_eq!(rule.priority, 2);
        assert_eq!(builder.priority, 1);
        assert!(builder.prompt.is_empty());
        assert!(builder.pending_prompt().is_err());
    }

    #[test]
    fn test_form_deserializes_with_defaults() {
        let builder: RuleBuilder =
            serde_json::from_str(r#"{"type":"loadLimit","loadGroup":"Ops"}"#).unwrap();
        assert_eq!(builder.kind, RuleType::LoadLimit);
        assert_eq!(builder.max_slots_per_phase, 1);
        assert_eq!(builder.priority, 1);
    }

    #[test]
    fn test_split_task_list() {
        assert_eq!(split_task_list(" T1 ,T2,, T3 "), vec!["T1", "T2", "T3"]);
        assert!(split_task_list("").is_empty());
    }
}
