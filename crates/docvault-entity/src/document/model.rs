//! Document entity model.

use chrono::{DateTime, Utc};
use docvault_core::types::{DocumentId, FolderId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A PDF document registered in DocVault.
///
/// `stored_filename` and `file_size` describe the content of version 1.
/// Later versions carry their own stored filenames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// The filename supplied at upload time.
    pub original_filename: String,
    /// Opaque key of the initial content in the content store.
    pub stored_filename: String,
    /// Size of the initial content in bytes.
    pub file_size: i64,
    /// The folder containing this document, if any.
    pub folder_id: Option<FolderId>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated (including new versions).
    pub updated_at: DateTime<Utc>,
    /// Caller identity that created the document.
    pub created_by: String,
}

impl Document {
    /// Get the original file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.original_filename
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.original_filename)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to register a new document together with its first version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// The filename supplied at upload time.
    pub original_filename: String,
    /// Opaque key of the content already written to the content store.
    pub stored_filename: String,
    /// Content size in bytes.
    pub file_size: i64,
    /// Target folder.
    pub folder_id: Option<FolderId>,
    /// Caller identity.
    pub created_by: String,
}
