//! Document metadata entries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use docvault_core::types::{DocumentId, MetadataEntryId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Key/value view of a document's metadata, ordered by key.
pub type MetadataMap = BTreeMap<String, Option<String>>;

/// A single metadata key/value pair attached to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MetadataEntry {
    /// Unique entry identifier.
    pub id: MetadataEntryId,
    /// The document this entry belongs to.
    pub document_id: DocumentId,
    /// Metadata key, unique per document.
    pub key: String,
    /// Metadata value.
    pub value: Option<String>,
    /// When the key was first set.
    pub created_at: DateTime<Utc>,
    /// When the value was last written.
    pub updated_at: DateTime<Utc>,
}

impl MetadataEntry {
    /// Collapse a list of entries into a key-ordered map.
    pub fn into_map(entries: impl IntoIterator<Item = MetadataEntry>) -> MetadataMap {
        entries.into_iter().map(|e| (e.key, e.value)).collect()
    }
}
