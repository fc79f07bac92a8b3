//! Dataset upload and grid editing handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use roster::{Dataset, GridView, SummaryReport, UploadSummary};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request to edit one cell.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCellRequest {
    /// Zero-based row index.
    pub row_index: usize,
    /// Column name, as in the header.
    pub column: String,
    /// New cell text.
    pub value: String,
}

fn parse_dataset(name: &str) -> Result<Dataset, ApiError> {
    Ok(name.parse::<Dataset>()?)
}

/// POST /api/upload/:dataset - Replace a dataset with uploaded delimited text.
pub async fn upload_dataset(
    State(state): State<AppState>,
    Path(dataset): Path<String>,
    body: String,
) -> Result<Json<UploadSummary>, ApiError> {
    let dataset = parse_dataset(&dataset)?;
    let summary = state
        .session
        .load_text(dataset, &body)
        .map_err(|e| ApiError::BadRequest(format!("could not parse upload: {}", e)))?;
    Ok(Json(summary))
}

/// GET /api/grid/:dataset - Rendered grid with errors and loading flag.
pub async fn get_grid(
    State(state): State<AppState>,
    Path(dataset): Path<String>,
) -> Result<Json<GridView>, ApiError> {
    let dataset = parse_dataset(&dataset)?;
    Ok(Json(state.grids.editor(dataset).render()))
}

/// POST /api/grid/:dataset/cell - Edit one cell.
pub async fn edit_cell(
    State(state): State<AppState>,
    Path(dataset): Path<String>,
    Json(request): Json<EditCellRequest>,
) -> Result<Json<GridView>, ApiError> {
    let dataset = parse_dataset(&dataset)?;
    let editor = state.grids.editor(dataset);
    editor.edit_cell(request.row_index, &request.column, request.value)?;
    Ok(Json(editor.render()))
}

/// POST /api/grid/:dataset/revalidate - Validate now, skipping the debounce.
pub async fn revalidate(
    State(state): State<AppState>,
    Path(dataset): Path<String>,
) -> Result<Json<GridView>, ApiError> {
    let dataset = parse_dataset(&dataset)?;
    let editor = state.grids.editor(dataset);
    editor.revalidate_now().await;
    Ok(Json(editor.render()))
}

/// GET /api/summary - Error counts per dataset.
pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryReport> {
    Json(state.session.summary().report())
}
