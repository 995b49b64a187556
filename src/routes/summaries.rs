//! Summary API routes

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::documents::owned_document;
use crate::auth::AuthenticatedUser;
use crate::error::{AppError, Result};
use crate::export::ExportFormat;
use crate::state::AppState;
use crate::store::Summary;

/// Reports the format actually produced, which differs from the request
/// when PDF rendering fell back to HTML
pub const EXPORT_FORMAT_HEADER: HeaderName = HeaderName::from_static("x-export-format");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/summaries", post(create_summary))
        .route("/:id/summaries", get(list_versions))
        .route("/:id/summary", get(get_summary))
        .route("/:id/summary/export", get(export_summary))
}

/// Generate a new summary version
async fn create_summary(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(document_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Summary>)> {
    owned_document(&state, document_id, &user).await?;
    let summary = state.summaries().create_summary(document_id).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// Get the current summary
async fn get_summary(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(document_id): Path<Uuid>,
) -> Result<Json<Summary>> {
    owned_document(&state, document_id, &user).await?;
    let summary = state.summaries().get_summary(document_id).await?;
    Ok(Json(summary))
}

/// List every summary version, oldest first
async fn list_versions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(document_id): Path<Uuid>,
) -> Result<Json<Vec<Summary>>> {
    owned_document(&state, document_id, &user).await?;
    let versions = state.summaries().list_versions(document_id).await?;
    Ok(Json(versions))
}

#[derive(Debug, Deserialize)]
struct ExportQuery {
    #[serde(default)]
    format: ExportFormat,
}

/// Download the current summary as a file
async fn export_summary(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(document_id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response> {
    let document = owned_document(&state, document_id, &user).await?;
    let summary = state.summaries().get_summary(document_id).await?;

    let renderer = state.renderer().clone();
    let artifact = tokio::task::spawn_blocking(move || {
        renderer.render(&summary, &document.title, query.format)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Export task failed: {}", e)))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, artifact.content_type)
        .header(header::CONTENT_LENGTH, artifact.bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"; filename*=UTF-8''{}",
                artifact.filename,
                urlencoding::encode(&artifact.filename)
            ),
        )
        .header(EXPORT_FORMAT_HEADER, artifact.format.as_str())
        .body(Body::from(artifact.bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}
