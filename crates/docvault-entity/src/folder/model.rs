//! Folder entity model.

use chrono::{DateTime, Utc};
use docvault_core::types::FolderId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A folder in the document hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<FolderId>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
    /// Caller identity that created the folder.
    pub created_by: String,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Parent folder (None for root).
    pub parent_id: Option<FolderId>,
    /// Caller identity.
    pub created_by: String,
}
