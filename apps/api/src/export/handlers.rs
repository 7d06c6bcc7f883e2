//! Axum route handlers for the Export API.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::export::ExportSummary;
use crate::layout::{Block, Page, PageGeometry};
use crate::state::AppState;

const MAX_FILENAME_LEN: usize = 200;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub filename: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    #[serde(flatten)]
    pub summary: ExportSummary,
    pub download_url: String,
}

#[derive(Debug, Serialize)]
pub struct ExportStatusResponse {
    pub is_exporting: bool,
}

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub geometry: PageGeometry,
    pub page_count: usize,
    pub pages: Vec<Page>,
}

/// The filename is used verbatim, so it only has to be a single safe path component.
fn validate_filename(filename: &str) -> Result<(), AppError> {
    if filename.trim().is_empty() {
        return Err(AppError::Validation("filename cannot be empty".to_string()));
    }
    if filename.len() > MAX_FILENAME_LEN {
        return Err(AppError::Validation(format!(
            "filename must be at most {MAX_FILENAME_LEN} bytes"
        )));
    }
    if filename.contains(['/', '\\'])
        || matches!(filename, "." | "..")
        || filename.chars().any(char::is_control)
    {
        return Err(AppError::Validation(format!(
            "filename '{}' is not a plain file name",
            filename.escape_debug()
        )));
    }
    Ok(())
}

/// `attachment` with an ASCII fallback name plus the exact UTF-8 name (RFC 6266).
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() && c != '"' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/exports
///
/// Runs one export to completion. Returns 409 while another export is in flight.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Json<ExportResponse>, AppError> {
    validate_filename(&request.filename)?;

    let summary = state
        .exporter
        .export(request.blocks, &request.filename)
        .await?;
    let download_url = format!("/api/v1/exports/{}", urlencoding::encode(&summary.filename));

    Ok(Json(ExportResponse {
        summary,
        download_url,
    }))
}

/// GET /api/v1/exports
pub async fn handle_status(State(state): State<AppState>) -> Json<ExportStatusResponse> {
    Json(ExportStatusResponse {
        is_exporting: state.exporter.is_exporting(),
    })
}

/// GET /api/v1/exports/:filename
///
/// Serves a delivered document as an attachment.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    validate_filename(&filename)?;

    let bytes = state
        .files
        .read(&filename)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound(format!("export '{filename}' not found")))?;

    let disposition = content_disposition(&filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(bytes),
    )
        .into_response())
}

/// POST /api/v1/layout
///
/// Dry run: paginates the blocks and returns positioned lines per page.
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, AppError> {
    let pages = state.exporter.layout(request.blocks).await?;
    Ok(Json(LayoutResponse {
        geometry: state.exporter.geometry(),
        page_count: pages.len(),
        pages,
    }))
}
