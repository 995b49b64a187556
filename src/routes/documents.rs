//! Document upload and metadata endpoints
//!
//! Uploads are PDF only. The binary is written to the storage directory
//! under its generated id and stays readable for the configured TTL.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, SubsecRound, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::document::Document;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// PDF magic bytes
const PDF_SIGNATURE: &[u8] = b"%PDF";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload_document))
        .route("/", get(list_documents))
        .route("/:id", get(get_document))
}

/// Document record plus its remaining access window
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    #[serde(flatten)]
    pub document: Document,
    pub time_remaining: String,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        let time_remaining = document.time_remaining(Utc::now());
        Self {
            document,
            time_remaining,
        }
    }
}

/// Fetch a document owned by `user`
///
/// Other users' documents are reported as missing.
pub(crate) async fn owned_document(
    state: &AppState,
    document_id: Uuid,
    user: &AuthenticatedUser,
) -> Result<Document> {
    match state.documents().get(document_id).await? {
        Some(document) if document.user_id == user.user_id => Ok(document),
        _ => Err(AppError::NotFound(format!("Document {} not found", document_id))),
    }
}

/// Upload a PDF
async fn upload_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentResponse>)> {
    let limit = state.config().storage.max_upload_bytes;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            tracing::debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = field
            .file_name()
            .map(display_name)
            .unwrap_or_default();
        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(AppError::UnsupportedMediaType(
                "Only PDF files are supported".to_string(),
            ));
        }

        let data = field.bytes().await?;
        tracing::debug!("Read {} bytes for upload {:?}", data.len(), filename);

        if data.len() > limit {
            return Err(AppError::PayloadTooLarge { limit });
        }
        if !data.starts_with(PDF_SIGNATURE) {
            return Err(AppError::UnsupportedMediaType(
                "File content is not a PDF document".to_string(),
            ));
        }

        let document = store_upload(&state, user, filename, &data).await?;
        return Ok((StatusCode::CREATED, Json(document.into())));
    }

    tracing::warn!("No file field found in multipart upload");
    Err(AppError::BadRequest(
        "No file provided. Use field name 'file'".to_string(),
    ))
}

async fn store_upload(
    state: &AppState,
    user: AuthenticatedUser,
    title: String,
    data: &[u8],
) -> Result<Document> {
    let id = Uuid::new_v4();
    let storage_path = state
        .config()
        .storage
        .documents_dir
        .join(format!("{}.pdf", id));

    tokio::fs::write(&storage_path, data).await?;

    let uploaded_at = Utc::now().trunc_subsecs(6);
    let document = Document {
        id,
        user_id: user.user_id,
        title,
        storage_path,
        size_bytes: data.len() as i64,
        checksum: hex::encode(Sha256::digest(data)),
        uploaded_at,
        expires_at: uploaded_at + Duration::hours(state.config().storage.document_ttl_hours),
    };

    if let Err(e) = state.documents().register(&document).await {
        if let Err(cleanup) = tokio::fs::remove_file(&document.storage_path).await {
            tracing::warn!(
                "Failed to remove orphaned upload {}: {}",
                document.storage_path.display(),
                cleanup
            );
        }
        return Err(e.into());
    }

    tracing::info!(
        document_id = %document.id,
        user_id = %document.user_id,
        size = document.size_bytes,
        "Stored uploaded document"
    );

    Ok(document)
}

/// List the caller's documents, newest first
async fn list_documents(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<DocumentResponse>>> {
    let documents = state.documents().list_for_user(user.user_id).await?;
    Ok(Json(documents.into_iter().map(Into::into).collect()))
}

/// Get document metadata
async fn get_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(document_id): Path<Uuid>,
) -> Result<Json<DocumentResponse>> {
    let document = owned_document(&state, document_id, &user).await?;
    Ok(Json(document.into()))
}

/// Last path segment of a client-supplied file name
fn display_name(raw: &str) -> String {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim().to_string()
}
