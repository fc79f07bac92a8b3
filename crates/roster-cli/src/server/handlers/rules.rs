//! Rule authoring handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use roster::{Rule, RuleBuilder, RuleKind};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request to turn a sentence into a rule.
#[derive(Debug, Deserialize)]
pub struct GenerateRuleRequest {
    pub prompt: String,
}

/// A generated rule body, not yet in the rule book.
#[derive(Debug, Serialize)]
pub struct GenerateRuleResponse {
    pub rule: RuleKind,
}

/// Request to generate a rule and append it.
#[derive(Debug, Deserialize)]
pub struct AddGeneratedRuleRequest {
    pub prompt: String,
    #[serde(default = "default_priority")]
    pub priority: i64,
}

fn default_priority() -> i64 {
    1
}

/// An appended rule.
#[derive(Debug, Serialize)]
pub struct RuleResponse {
    pub rule: Rule,
}

async fn generate(state: &AppState, prompt: String) -> Result<RuleKind, ApiError> {
    let gateway = state.rule_generation.clone();
    tokio::task::spawn_blocking(move || gateway.generate(&prompt))
        .await?
        .map_err(|e| {
            tracing::warn!(error = %e, "rule generation failed");
            ApiError::RuleGeneration
        })
}

/// POST /api/generate-rule - Generate a rule body from a sentence.
pub async fn generate_rule(
    State(state): State<AppState>,
    Json(request): Json<GenerateRuleRequest>,
) -> Result<Json<GenerateRuleResponse>, ApiError> {
    let rule = generate(&state, request.prompt).await?;
    Ok(Json(GenerateRuleResponse { rule }))
}

/// GET /api/rules - Rules in insertion order.
pub async fn list_rules(State(state): State<AppState>) -> Json<Vec<Rule>> {
    Json(state.session.rules().await)
}

/// POST /api/rules - Submit the manual rule form.
pub async fn add_rule(
    State(state): State<AppState>,
    Json(form): Json<RuleBuilder>,
) -> Result<Json<RuleResponse>, ApiError> {
    let rule = state.session.submit_form(form).await?;
    Ok(Json(RuleResponse { rule }))
}

/// POST /api/rules/generate - Generate a rule and append it with `priority`.
pub async fn add_generated_rule(
    State(state): State<AppState>,
    Json(request): Json<AddGeneratedRuleRequest>,
) -> Result<Json<RuleResponse>, ApiError> {
    let kind = generate(&state, request.prompt).await?;
    let rule = state.session.accept_generated(kind, request.priority).await?;
    Ok(Json(RuleResponse { rule }))
}
