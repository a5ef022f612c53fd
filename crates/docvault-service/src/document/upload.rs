//! Upload orchestration: validate, store the bytes, register the result.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use docvault_core::config::StorageConfig;
use docvault_core::error::AppError;
use docvault_core::traits::storage::StorageProvider;
use docvault_core::types::{DocumentId, FolderId};
use docvault_entity::document::Version;
use docvault_storage::mime::{has_pdf_extension, is_pdf_mime, looks_like_pdf};
use docvault_storage::naming::{default_title, stored_filename};

use crate::context::RequestContext;
use crate::document::service::{
    CreatedDocument, DocumentService, MAX_FILENAME_LEN, RegisterDocumentRequest,
};
use crate::document::version::{AddVersionRequest, VersionService};

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename supplied by the client.
    pub filename: String,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// File content bytes.
    pub data: Bytes,
}

/// Parameters for uploading a new document.
#[derive(Debug, Clone)]
pub struct UploadDocumentParams {
    /// The file.
    pub file: UploadedFile,
    /// Title; defaults to the filename without `.pdf`.
    pub title: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Target folder.
    pub folder_id: Option<FolderId>,
}

/// Writes uploaded bytes to the content store and registers them.
///
/// Folder and document existence is checked before any bytes are written.
/// If registration fails after the write, the orphaned blob is removed.
#[derive(Clone)]
pub struct UploadService {
    documents: DocumentService,
    versions: VersionService,
    storage: Arc<dyn StorageProvider>,
    config: StorageConfig,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService")
            .field("provider", &self.storage.provider_type())
            .finish()
    }
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        documents: DocumentService,
        versions: VersionService,
        storage: Arc<dyn StorageProvider>,
        config: StorageConfig,
    ) -> Self {
        Self {
            documents,
            versions,
            storage,
            config,
        }
    }

    /// Uploads a new document; version 1 is created alongside it.
    pub async fn upload_document(
        &self,
        ctx: &RequestContext,
        params: UploadDocumentParams,
    ) -> Result<CreatedDocument, AppError> {
        self.check_file(&params.file)?;

        // Fail fast before writing anything; the store re-checks atomically.
        if let Some(folder_id) = params.folder_id {
            self.documents.require_folder(folder_id).await?;
        }

        let original_filename = params.file.filename.trim().to_string();
        let title = params
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| default_title(&original_filename));
        let key = self.store_bytes(&original_filename, params.file.data.clone()).await?;

        let registered = self
            .documents
            .create_document(
                ctx,
                RegisterDocumentRequest {
                    title,
                    description: params.description,
                    original_filename,
                    stored_filename: key.clone(),
                    file_size: params.file.data.len() as i64,
                    folder_id: params.folder_id,
                },
            )
            .await;

        match registered {
            Ok(created) => {
                info!(
                    actor = %ctx.actor,
                    document_id = %created.document.id,
                    stored_filename = %key,
                    "Document uploaded"
                );
                Ok(created)
            }
            Err(e) => {
                self.discard(&key).await;
                Err(e)
            }
        }
    }

    /// Uploads a new version of an existing document.
    pub async fn upload_version(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        file: UploadedFile,
        description: Option<String>,
    ) -> Result<Version, AppError> {
        self.check_file(&file)?;
        self.documents.get_document(document_id).await?;

        let key = self.store_bytes(file.filename.trim(), file.data.clone()).await?;
        let added = self
            .versions
            .add_version(
                ctx,
                AddVersionRequest {
                    document_id,
                    stored_filename: key.clone(),
                    file_size: file.data.len() as i64,
                    description,
                },
            )
            .await;

        match added {
            Ok(version) => Ok(version),
            Err(e) => {
                self.discard(&key).await;
                Err(e)
            }
        }
    }

    fn check_file(&self, file: &UploadedFile) -> Result<(), AppError> {
        if file.filename.trim().is_empty() {
            return Err(AppError::validation("Uploaded file has no filename"));
        }
        if file.filename.trim().chars().count() > MAX_FILENAME_LEN {
            return Err(AppError::validation(format!(
                "Filename cannot exceed {MAX_FILENAME_LEN} characters"
            )));
        }
        if file.data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if file.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::payload_too_large(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }
        if self.config.require_pdf {
            let declared_pdf = file.content_type.as_deref().is_some_and(is_pdf_mime);
            let named_pdf = has_pdf_extension(&file.filename);
            if !(declared_pdf || named_pdf) || !looks_like_pdf(&file.data) {
                return Err(AppError::validation("Only PDF files are allowed"));
            }
        }
        Ok(())
    }

    async fn store_bytes(&self, original_filename: &str, data: Bytes) -> Result<String, AppError> {
        let key = stored_filename(original_filename);
        let size = data.len();
        self.storage.write(&key, data).await.map_err(|e| {
            AppError::storage_unavailable(format!("Failed to store upload: {}", e.message))
        })?;
        debug!(stored_filename = %key, bytes = size, "Upload written to content store");
        Ok(key)
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.storage.delete(key).await {
            warn!(stored_filename = %key, error = %e, "Failed to remove orphaned upload");
        }
    }
}
