//! File download handlers.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use roster::{Dataset, ExportFile};

use crate::server::error::ApiError;
use crate::server::state::AppState;

fn attachment(file: ExportFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, file.mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.contents,
    )
        .into_response()
}

/// GET /api/export/rules - Download `rules.json`.
pub async fn export_rules(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(attachment(state.session.rules_export().await?))
}

/// GET /api/export/:dataset - Download `<dataset>.csv`.
pub async fn export_dataset(
    State(state): State<AppState>,
    Path(dataset): Path<String>,
) -> Result<Response, ApiError> {
    let dataset = dataset.parse::<Dataset>()?;
    state
        .session
        .table_export(dataset)?
        .map(attachment)
        .ok_or_else(|| ApiError::NotFound(format!("{} has no rows to export", dataset)))
}
