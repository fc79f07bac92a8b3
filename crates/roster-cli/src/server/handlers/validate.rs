//! One-shot validation handler.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use roster::{Dataset, Row, RowValidator, ValidationError};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request to validate a batch of rows.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    /// Which dataset the rows belong to.
    #[serde(rename = "type")]
    pub dataset: Dataset,
    /// Rows to check.
    pub data: Vec<Row>,
}

/// Validation result.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub errors: Vec<ValidationError>,
}

/// POST /api/validate - Ask the validator about rows without storing them.
pub async fn validate_rows(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let gateway = state.validation.clone();
    let ValidateRequest { dataset, data } = request;

    let errors = tokio::task::spawn_blocking(move || gateway.validate(dataset, &data))
        .await?
        .map_err(|e| {
            tracing::warn!(%dataset, error = %e, "validation request failed");
            ApiError::ValidationFailed
        })?;

    Ok(Json(ValidateResponse { errors }))
}
