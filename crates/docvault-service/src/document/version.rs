//! Document versioning: append, list, and current-version lookup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::types::DocumentId;
use docvault_database::RegistryStore;
use docvault_entity::document::{CreateVersion, Version};

use crate::context::RequestContext;
use crate::folder::service::normalize_optional;

/// Manages the append-only version history of documents.
#[derive(Debug, Clone)]
pub struct VersionService {
    /// Registry store.
    store: Arc<dyn RegistryStore>,
}

/// Request to append a version whose content is already stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddVersionRequest {
    /// Target document.
    pub document_id: DocumentId,
    /// Key of the stored content.
    pub stored_filename: String,
    /// Content size in bytes.
    pub file_size: i64,
    /// Optional change comment.
    pub description: Option<String>,
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self { store }
    }

    /// Appends the next version of a document.
    ///
    /// The store assigns `max(existing) + 1` atomically. A `VersionConflict`
    /// from a racing writer is retried once with a fresh computation before
    /// it is returned to the caller.
    pub async fn add_version(
        &self,
        ctx: &RequestContext,
        req: AddVersionRequest,
    ) -> Result<Version, AppError> {
        if req.stored_filename.is_empty() {
            return Err(AppError::validation("Stored filename cannot be empty"));
        }
        if req.file_size < 0 {
            return Err(AppError::validation("File size cannot be negative"));
        }

        let data = CreateVersion {
            document_id: req.document_id,
            stored_filename: req.stored_filename,
            file_size: req.file_size,
            description: normalize_optional(req.description),
            created_by: ctx.actor.clone(),
        };

        let version = match self.store.append_version(&data).await {
            Err(e) if e.is(ErrorKind::VersionConflict) => {
                warn!(
                    document_id = %data.document_id,
                    "Version number conflict, retrying once"
                );
                self.store.append_version(&data).await?
            }
            other => other?,
        };

        info!(
            actor = %ctx.actor,
            document_id = %version.document_id,
            version = version.version_number,
            size = version.file_size,
            "Version added"
        );

        Ok(version)
    }

    /// Returns the version with the highest number.
    ///
    /// Fails with `UnknownDocument` if the document is missing and with
    /// `NoVersions` if it has no versions at all.
    pub async fn current_version(&self, document_id: DocumentId) -> Result<Version, AppError> {
        self.require_document(document_id).await?;
        self.store
            .latest_version(document_id)
            .await?
            .ok_or_else(|| AppError::no_versions(format!("Document {document_id} has no versions")))
    }

    /// Lists all versions of a document, oldest first.
    pub async fn list_versions(&self, document_id: DocumentId) -> Result<Vec<Version>, AppError> {
        self.require_document(document_id).await?;
        self.store.list_versions(document_id).await
    }

    /// Gets one version by number.
    pub async fn get_version(
        &self,
        document_id: DocumentId,
        version_number: i32,
    ) -> Result<Version, AppError> {
        self.require_document(document_id).await?;
        self.store
            .find_version(document_id, version_number)
            .await?
            .ok_or_else(|| {
                AppError::unknown_version(format!(
                    "Document {document_id} has no version {version_number}"
                ))
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
