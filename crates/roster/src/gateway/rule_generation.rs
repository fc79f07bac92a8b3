//! Rule generation gateway: turn a sentence into one rule.

use std::sync::Arc;

use crate::error::{Result, RosterError};
use crate::extract;
use crate::llm::{prompts, LlmProvider};
use crate::rules::RuleKind;

/// Converts natural-language rule descriptions into [`RuleKind`] values.
///
/// The reply is stripped of code fences and parsed as one JSON object. The
/// object must name a supported rule type and carry that type's fields; a
/// reply that parses but breaks the rule's shape is rejected so it can never
/// reach the rule book.
pub struct RuleGenerationGateway {
    provider: Arc<dyn LlmProvider>,
}

impl RuleGenerationGateway {
    /// Create a gateway backed by `provider`.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Generate one rule body (without priority) from `sentence`.
    pub fn generate(&self, sentence: &str) -> Result<RuleKind> {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return Err(RosterError::InvalidRule("rule prompt is empty".to_string()));
        }

        tracing::debug!(provider = self.provider.name(), "requesting rule generation");
        let raw = self.provider.complete(&prompts::rule_prompt(sentence))?;

        let kind: RuleKind = extract::parse_fenced_object(&raw).inspect_err(|e| {
            tracing::warn!(error = %e, "generated rule could not be parsed");
        })?;
        kind.validate()?;

        tracing::debug!(rule_type = %kind.rule_type(), "rule generated");
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockProvider;

    fn gateway_with(reply: &str) -> (Arc<MockProvider>, RuleGenerationGateway) {
        let provider = Arc::new(MockProvider::new());
        provider.push_reply(reply);
        let gateway = RuleGenerationGateway::new(provider.clone());
        (provider, gateway)
    }

    #[test]
    fn test_fenced_load_limit() {
        let (provider, gateway) = gateway_with(
            "```json\n{\"type\":\"loadLimit\",\"group\":\"Backend\",\"maxSlotsPerPhase\":3}\n```",
        );

        let kind = gateway.generate("Limit Backend group to 3 tasks per phase").unwrap();
        assert_eq!(
            kind,
            RuleKind::LoadLimit {
                group: "Backend".into(),
                max_slots_per_phase: 3
            }
        );
        assert!(provider.prompts()[0].contains("\"Limit Backend group to 3 tasks per phase\""));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let (_, gateway) = gateway_with("{\"type\":\"phaseWindow\",\"task\":\"T1\",\"phases\":[1,2]}");
        assert!(matches!(
            gateway.generate("T1 only in phases 1-2"),
            Err(RosterError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_shape_violation_rejected() {
        let (_, gateway) = gateway_with("{\"type\":\"coRun\",\"tasks\":[\"T1\"]}");
        assert!(matches!(
            gateway.generate("Run T1 together"),
            Err(RosterError::InvalidRule(_))
        ));
    }

    #[test]
    fn test_prose_reply_rejected() {
        let (_, gateway) = gateway_with("I could not understand that rule.");
        assert!(gateway.generate("something vague").is_err());
    }

    #[test]
    fn test_empty_sentence_skips_provider() {
        let provider = Arc::new(MockProvider::new());
        let gateway = RuleGenerationGateway::new(provider.clone());
        assert!(gateway.generate("   ").is_err());
        assert_eq!(provider.call_count(), 0);
    }
}
