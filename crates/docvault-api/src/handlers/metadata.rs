//! Document metadata handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use docvault_core::types::DocumentId;

use crate::dto::request::SetMetadataRequest;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::extractors::path::parse_id;
use crate::state::AppState;

/// GET /api/documents/{id}/metadata
pub async fn get_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: DocumentId = parse_id(&id, "document id")?;
    let metadata = state.metadata_service.get_metadata(id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": metadata }),
    ))
}

/// GET /api/documents/{id}/metadata/{key}
pub async fn get_entry(
    State(state): State<AppState>,
    Path((id, key)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: DocumentId = parse_id(&id, "document id")?;
    let entry = state.metadata_service.get_entry(id, &key).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": entry })))
}

/// PUT /api/documents/{id}/metadata/{key}
pub async fn set_entry(
    State(state): State<AppState>,
    actor: Actor,
    Path((id, key)): Path<(String, String)>,
    payload: Result<Json<SetMetadataRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: DocumentId = parse_id(&id, "document id")?;
    let Json(req) = payload?;
    let entry = state
        .metadata_service
        .set_metadata(&actor, id, &key, req.value)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": entry })))
}
