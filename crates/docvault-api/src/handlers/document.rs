//! Document listing, registration, and lookup handlers.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;

use docvault_core::types::DocumentId;
use docvault_service::document::UploadDocumentParams;

use crate::dto::request::DocumentListQuery;
use crate::error::ApiError;
use crate::extractors::path::parse_id;
use crate::extractors::{Actor, UploadForm};
use crate::state::AppState;

/// GET /api/documents?folderId=...
pub async fn list_documents(
    State(state): State<AppState>,
    query: Result<Query<DocumentListQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Query(query) = query?;
    let documents = state
        .document_service
        .list_documents(query.folder_id)
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": documents }),
    ))
}

/// POST /api/documents: multipart upload of a new document
///
/// Responds with the document and its first version.
pub async fn create_document(
    State(state): State<AppState>,
    actor: Actor,
    multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;

    let created = state
        .upload_service
        .upload_document(
            &actor,
            UploadDocumentParams {
                file,
                title: form.title,
                description: form.description,
                folder_id: form.folder_id,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": created })),
    ))
}

/// GET /api/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: DocumentId = parse_id(&id, "document id")?;
    let document = state.document_service.get_document(id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": document }),
    ))
}
