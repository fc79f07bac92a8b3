//! Application state for the web server.

use std::sync::Arc;

use roster::{
    GridConfig, GridSet, LlmProvider, RuleGenerationGateway, Session, ValidationGateway,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Datasets, rules and error counts.
    pub session: Arc<Session>,
    /// One grid editor per dataset.
    pub grids: Arc<GridSet>,
    /// Gateway behind `/api/validate` and the grid editors.
    pub validation: Arc<ValidationGateway>,
    /// Gateway behind rule generation.
    pub rule_generation: Arc<RuleGenerationGateway>,
}

impl AppState {
    /// Create state around `session`. Must be called inside a tokio runtime.
    pub fn new(session: Session, provider: Arc<dyn LlmProvider>, config: GridConfig) -> Self {
        let session = Arc::new(session);
        let validation = Arc::new(ValidationGateway::new(Arc::clone(&provider)));
        let grids = GridSet::spawn(
            Arc::clone(session.store()),
            validation.clone(),
            config,
            session.summary(),
        );

        Self {
            session,
            grids: Arc::new(grids),
            validation,
            rule_generation: Arc::new(RuleGenerationGateway::new(provider)),
        }
    }

    /// Name of the configured LLM provider (for display).
    pub fn provider_name(&self) -> &str {
        self.validation.provider_name()
    }
}
