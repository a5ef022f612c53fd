//! Document version entity.

use chrono::{DateTime, Utc};
use docvault_core::types::{DocumentId, VersionId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An immutable, numbered version of a document's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Version {
    /// Unique version row identifier.
    pub id: VersionId,
    /// The document this version belongs to.
    pub document_id: DocumentId,
    /// Sequential version number, starting at 1.
    pub version_number: i32,
    /// Opaque key of this version's content in the content store.
    pub stored_filename: String,
    /// Size in bytes.
    pub file_size: i64,
    /// Optional comment describing the change.
    pub description: Option<String>,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
    /// Caller identity that created this version.
    pub created_by: String,
}

/// Data required to append a version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVersion {
    /// Target document.
    pub document_id: DocumentId,
    /// Opaque key of the content already written to the content store.
    pub stored_filename: String,
    /// Content size in bytes.
    pub file_size: i64,
    /// Optional comment.
    pub description: Option<String>,
    /// Caller identity.
    pub created_by: String,
}
