//! Per-document key/value metadata.
//!
//! Each `(document, key)` pair holds one value. Writes overwrite in place and
//! the last write wins.

use std::sync::Arc;

use tracing::info;

use docvault_core::error::AppError;
use docvault_core::types::DocumentId;
use docvault_database::RegistryStore;
use docvault_entity::document::{MetadataEntry, MetadataMap};

use crate::context::RequestContext;

/// Longest metadata key accepted.
pub const MAX_KEY_LEN: usize = 100;

/// Reads and writes document metadata.
#[derive(Debug, Clone)]
pub struct MetadataService {
    store: Arc<dyn RegistryStore>,
}

impl MetadataService {
    /// Creates a new metadata service.
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self { store }
    }

    /// Sets `key` to `value` on a document.
    pub async fn set_metadata(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        key: &str,
        value: Option<String>,
    ) -> Result<MetadataEntry, AppError> {
        let key = validate_key(key)?;
        let entry = self
            .store
            .upsert_metadata(document_id, key, value.as_deref())
            .await?;

        info!(
            actor = %ctx.actor,
            document_id = %document_id,
            key = %entry.key,
            "Metadata set"
        );

        Ok(entry)
    }

    /// Returns the full metadata map of a document, ordered by key.
    pub async fn get_metadata(&self, document_id: DocumentId) -> Result<MetadataMap, AppError> {
        Ok(MetadataEntry::into_map(self.list_entries(document_id).await?))
    }

    /// Returns every entry of a document with its timestamps.
    pub async fn list_entries(&self, document_id: DocumentId) -> Result<Vec<MetadataEntry>, AppError> {
        self.require_document(document_id).await?;
        self.store.list_metadata(document_id).await
    }

    /// Returns one entry, failing with `NotFound` when the key is absent.
    pub async fn get_entry(
        &self,
        document_id: DocumentId,
        key: &str,
    ) -> Result<MetadataEntry, AppError> {
        let key = validate_key(key)?;
        self.require_document(document_id).await?;
        self.store
            .find_metadata(document_id, key)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Document {document_id} has no metadata key '{key}'"))
            })
    }

    async fn require_document(&self, document_id: DocumentId) -> Result<(), AppError> {
        match self.store.find_document(document_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::unknown_document(format!(
                "Document {document_id} not found"
            ))),
        }
    }
}

fn validate_key(key: &str) -> Result<&str, AppError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::validation("Metadata key cannot be empty"));
    }
    if key.chars().count() > MAX_KEY_LEN {
        return Err(AppError::validation(format!(
            "Metadata key cannot exceed {MAX_KEY_LEN} characters"
        )));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::ErrorKind;

    #[test]
    fn test_validate_key() {
        assert_eq!(validate_key(" author ").unwrap(), "author");
        assert_eq!(validate_key("").unwrap_err().kind, ErrorKind::Validation);
        let long = "k".repeat(MAX_KEY_LEN + 1);
        assert_eq!(validate_key(&long).unwrap_err().kind, ErrorKind::Validation);
        assert!(validate_key(&"k".repeat(MAX_KEY_LEN)).is_ok());
    }
}
