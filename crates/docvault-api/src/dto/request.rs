//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use docvault_core::types::FolderId;

/// Create folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name must be 1-255 characters"))]
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Parent folder; `None` creates a root folder.
    #[serde(default, alias = "parentId")]
    pub parent_id: Option<FolderId>,
}

/// Move folder request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveFolderRequest {
    /// New parent; `None` moves the folder to the root.
    #[serde(default, alias = "parentId")]
    pub parent_id: Option<FolderId>,
}

/// Set metadata request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetMetadataRequest {
    /// New value; `null` stores an explicit absent value.
    #[serde(default)]
    pub value: Option<String>,
}

/// Query parameters for `GET /api/documents`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentListQuery {
    /// Only documents in this folder.
    #[serde(default, alias = "folderId")]
    pub folder_id: Option<FolderId>,
}

/// Query parameters for `GET /api/documents/{id}/content`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentQuery {
    /// Version number; the current version when absent.
    #[serde(default)]
    pub version: Option<i32>,
}
