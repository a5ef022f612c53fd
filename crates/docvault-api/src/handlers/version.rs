//! Version history handlers.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;

use docvault_core::types::DocumentId;

use crate::error::ApiError;
use crate::extractors::path::{parse_id, parse_version_number};
use crate::extractors::{Actor, UploadForm};
use crate::state::AppState;

/// GET /api/documents/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: DocumentId = parse_id(&id, "document id")?;
    let versions = state.version_service.list_versions(id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": versions }),
    ))
}

/// POST /api/documents/{id}/versions: multipart upload of the next version
pub async fn add_version(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let id: DocumentId = parse_id(&id, "document id")?;
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;

    let version = state
        .upload_service
        .upload_version(&actor, id, file, form.description)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": version })),
    ))
}

/// GET /api/documents/{id}/versions/current
pub async fn current_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: DocumentId = parse_id(&id, "document id")?;
    let version = state.version_service.current_version(id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": version })))
}

/// GET /api/documents/{id}/versions/{n}
pub async fn get_version(
    State(state): State<AppState>,
    Path((id, number)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: DocumentId = parse_id(&id, "document id")?;
    let number = parse_version_number(&number)?;
    let version = state.version_service.get_version(id, number).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": version })))
}
