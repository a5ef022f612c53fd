//! Document registration and listing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use docvault_core::error::AppError;
use docvault_core::types::{DocumentId, FolderId};
use docvault_database::RegistryStore;
use docvault_entity::document::{CreateDocument, Document, Version};

use crate::context::RequestContext;
use crate::folder::service::normalize_optional;

/// Longest document title accepted.
pub const MAX_TITLE_LEN: usize = 255;

/// Longest original filename accepted.
pub const MAX_FILENAME_LEN: usize = 255;

/// Registers and looks up documents.
#[derive(Debug, Clone)]
pub struct DocumentService {
    /// Registry store.
    store: Arc<dyn RegistryStore>,
}

/// Request to register a document whose content is already stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDocumentRequest {
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Filename supplied by the client.
    pub original_filename: String,
    /// Key of the stored content.
    pub stored_filename: String,
    /// Content size in bytes.
    pub file_size: i64,
    /// Target folder.
    pub folder_id: Option<FolderId>,
}

/// A freshly registered document and its implicit first version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedDocument {
    /// The document row.
    pub document: Document,
    /// Version 1.
    pub version: Version,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self { store }
    }

    /// Registers a document together with version 1 referencing the same
    /// stored content.
    ///
    /// Fails with `InvalidFolder` if `folder_id` is set but unknown; nothing
    /// is written in that case.
    pub async fn create_document(
        &self,
        ctx: &RequestContext,
        req: RegisterDocumentRequest,
    ) -> Result<CreatedDocument, AppError> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Document title cannot be empty"));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::validation(format!(
                "Document title cannot exceed {MAX_TITLE_LEN} characters"
            )));
        }
        if req.original_filename.trim().is_empty() {
            return Err(AppError::validation("Original filename cannot be empty"));
        }
        if req.original_filename.chars().count() > MAX_FILENAME_LEN {
            return Err(AppError::validation(format!(
                "Original filename cannot exceed {MAX_FILENAME_LEN} characters"
            )));
        }
        if req.stored_filename.is_empty() {
            return Err(AppError::validation("Stored filename cannot be empty"));
        }
        if req.file_size < 0 {
            return Err(AppError::validation("File size cannot be negative"));
        }

        let (document, version) = self
            .store
            .insert_document(&CreateDocument {
                title: title.to_string(),
                description: normalize_optional(req.description),
                original_filename: req.original_filename,
                stored_filename: req.stored_filename,
                file_size: req.file_size,
                folder_id: req.folder_id,
                created_by: ctx.actor.clone(),
            })
            .await?;

        info!(
            actor = %ctx.actor,
            document_id = %document.id,
            folder_id = ?document.folder_id,
            size = document.file_size,
            "Document registered"
        );

        Ok(CreatedDocument { document, version })
    }

    /// Gets a document by ID, failing with `UnknownDocument`.
    pub async fn get_document(&self, document_id: DocumentId) -> Result<Document, AppError> {
        self.store
            .find_document(document_id)
            .await?
            .ok_or_else(|| AppError::unknown_document(format!("Document {document_id} not found")))
    }

    /// Lists documents in creation order. With a folder, only that folder's
    /// documents are returned and an unknown folder fails with `InvalidFolder`.
    pub async fn list_documents(&self, folder: Option<FolderId>) -> Result<Vec<Document>, AppError> {
        if let Some(folder_id) = folder {
            self.require_folder(folder_id).await?;
        }
        self.store.list_documents(folder).await
    }

    /// Fails with `InvalidFolder` unless the folder exists.
    pub async fn require_folder(&self, folder_id: FolderId) -> Result<(), AppError> {
        match self.store.find_folder(folder_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::invalid_folder(format!(
                "Folder {folder_id} does not exist"
            ))),
        }
    }
}
