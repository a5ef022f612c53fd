//! Folder CRUD and tree handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use docvault_core::types::FolderId;
use docvault_service::folder::CreateFolderRequest as SvcCreateFolder;

use crate::dto::request::{CreateFolderRequest, MoveFolderRequest};
use crate::error::ApiError;
use crate::extractors::path::parse_id;
use crate::extractors::{Actor, ValidatedJson};
use crate::state::AppState;

/// GET /api/folders
pub async fn list_folders(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let folders = state.folder_service.list_folders().await?;
    Ok(Json(serde_json::json!({ "success": true, "data": folders })))
}

/// GET /api/folders/tree
pub async fn get_tree(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let tree = state.folder_service.folder_tree().await?;
    Ok(Json(serde_json::json!({ "success": true, "data": tree })))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: FolderId = parse_id(&id, "folder id")?;
    let folder = state.folder_service.get_folder(id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": folder })))
}

/// GET /api/folders/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: FolderId = parse_id(&id, "folder id")?;
    let children = state.folder_service.list_children(Some(id)).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": children }),
    ))
}

/// GET /api/folders/{id}/path
pub async fn get_path(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: FolderId = parse_id(&id, "folder id")?;
    let path = state.folder_service.folder_path(id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": path })))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let folder = state
        .folder_service
        .create_folder(
            &actor,
            SvcCreateFolder {
                name: req.name,
                description: req.description,
                parent_id: req.parent_id,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": folder })),
    ))
}

/// PUT /api/folders/{id}/move
pub async fn move_folder(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    payload: Result<Json<MoveFolderRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: FolderId = parse_id(&id, "folder id")?;
    let Json(req) = payload?;
    let folder = state
        .folder_service
        .move_folder(&actor, id, req.parent_id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": folder })))
}
