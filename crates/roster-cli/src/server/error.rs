//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use roster::RosterError;

const VALIDATION_FAILED: &str = "Validation failed.";
const RULE_GENERATION_FAILED: &str = "AI failed to parse rule.";

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from client.
    BadRequest(String),
    /// Internal server error.
    Internal(String),
    /// Validation call failed; answered as an empty error list and a notice.
    ValidationFailed,
    /// Rule generation failed; answered as `{ error }`.
    RuleGeneration,
    /// Error from the roster library.
    Roster(RosterError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::ValidationFailed => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "errors": [], "error": VALIDATION_FAILED })),
                )
                    .into_response();
            }
            ApiError::RuleGeneration => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": RULE_GENERATION_FAILED })),
                )
                    .into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
            ApiError::Roster(e) => {
                let status = match &e {
                    RosterError::UnknownDataset(_) => StatusCode::NOT_FOUND,
                    RosterError::UnknownColumn { .. }
                    | RosterError::RowOutOfRange { .. }
                    | RosterError::InvalidRule(_)
                    | RosterError::Csv(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, "roster_error", e.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        ApiError::Roster(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("background task failed: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ValidationFailed => f.write_str(VALIDATION_FAILED),
            ApiError::RuleGeneration => f.write_str(RULE_GENERATION_FAILED),
            ApiError::Roster(e) => write!(f, "Roster error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
