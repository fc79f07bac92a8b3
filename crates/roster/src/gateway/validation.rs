//! Validation gateway: ask the text-generation service to check rows.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Row};
use crate::error::Result;
use crate::extract;
use crate::llm::{prompts, LlmProvider};

/// One field-level problem reported for a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Zero-based index of the row.
    pub row_index: usize,
    /// Column the problem belongs to. Matched case-insensitively.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(row_index: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row_index,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error belongs to the cell at `row`, `column`.
    pub fn matches(&self, row: usize, column: &str) -> bool {
        self.row_index == row && self.field.to_lowercase() == column.to_lowercase()
    }
}

/// Anything that can check a dataset's rows.
///
/// Calls may block; async callers should use the blocking pool.
pub trait RowValidator: Send + Sync {
    fn validate(&self, dataset: Dataset, rows: &[Row]) -> Result<Vec<ValidationError>>;
}

/// Validates rows through an LLM provider.
///
/// The reply must contain a JSON array of [`ValidationError`] objects; the
/// span between the first `[` and the last `]` is parsed strictly and any
/// failure is reported as a malformed response rather than a partial result.
pub struct ValidationGateway {
    provider: Arc<dyn LlmProvider>,
}

impl ValidationGateway {
    /// Create a gateway backed by `provider`.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

impl RowValidator for ValidationGateway {
    fn validate(&self, dataset: Dataset, rows: &[Row]) -> Result<Vec<ValidationError>> {
        let prompt = prompts::validation_prompt(dataset, rows)?;
        tracing::debug!(
            %dataset,
            rows = rows.len(),
            provider = self.provider.name(),
            "requesting validation"
        );

        let raw = self.provider.complete(&prompt)?;
        let errors: Vec<ValidationError> = extract::parse_embedded_array(&raw).inspect_err(|e| {
            tracing::warn!(%dataset, error = %e, "validation reply could not be parsed");
        })?;

        tracing::debug!(%dataset, errors = errors.len(), "validation finished");
        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use crate::llm::MockProvider;

    fn rows() -> Vec<Row> {
        let mut row = Row::new();
        row.insert("id".into(), "1".into());
        row.insert("email".into(), "".into());
        vec![row]
    }

    #[test]
    fn test_matches_is_case_insensitive_on_field_only() {
        let error = ValidationError::new(2, "Email", "Invalid email");
        assert!(error.matches(2, "email"));
        assert!(error.matches(2, "EMAIL"));
        assert!(!error.matches(0, "email"));
        assert!(!error.matches(2, "Email2"));
    }

    #[test]
    fn test_wire_format() {
        let error = ValidationError::new(0, "email", "Missing email");
        assert_eq!(
            serde_json::to_string(&error).unwrap(),
            r#"{"rowIndex":0,"field":"email","message":"Missing email"}"#
        );
    }

    #[test]
    fn test_extracts_array_from_prose() {
        let provider = Arc::new(MockProvider::new());
        provider.push_reply(
            "Here you go:\n[{\"rowIndex\":0,\"field\":\"email\",\"message\":\"Missing email\"}]\nThanks",
        );
        let gateway = ValidationGateway::new(provider.clone());

        let errors = gateway.validate(Dataset::Clients, &rows()).unwrap();
        assert_eq!(errors, vec![ValidationError::new(0, "email", "Missing email")]);
        assert!(provider.prompts()[0].contains("\"clients\""));
    }

    #[test]
    fn test_malformed_reply_is_failure() {
        let provider = Arc::new(MockProvider::new());
        provider.push_reply("All rows look fine.");
        provider.push_reply("[{\"rowIndex\":-1,\"field\":\"id\",\"message\":\"bad\"}]");
        provider.push_reply("[{\"row\":0}]");
        let gateway = ValidationGateway::new(provider);

        for _ in 0..3 {
            let err = gateway.validate(Dataset::Tasks, &rows()).unwrap_err();
            assert!(matches!(err, RosterError::MalformedResponse(_)));
        }
    }

    #[test]
    fn test_provider_failure_propagates() {
        let provider = Arc::new(MockProvider::new());
        provider.push_failure("timeout");
        let gateway = ValidationGateway::new(provider);

        let err = gateway.validate(Dataset::Workers, &rows()).unwrap_err();
        assert!(matches!(err, RosterError::Provider(_)));
    }
}
