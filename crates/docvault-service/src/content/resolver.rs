//! Resolves `(document, version?)` to a content reference and streams bytes.

use std::sync::Arc;

use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::traits::storage::{ByteStream, StorageProvider};
use docvault_core::types::DocumentId;
use docvault_database::RegistryStore;
use docvault_entity::document::ContentRef;
use docvault_storage::mime::PDF_MIME;

/// Translates registry identifiers into content store keys.
///
/// Resolution reads the registry only; opening the stream touches the
/// content store only. No registry transaction spans the byte transfer.
#[derive(Clone)]
pub struct ContentResolver {
    store: Arc<dyn RegistryStore>,
    storage: Arc<dyn StorageProvider>,
}

impl std::fmt::Debug for ContentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentResolver")
            .field("backend", &self.store.backend())
            .field("provider", &self.storage.provider_type())
            .finish()
    }
}

impl ContentResolver {
    /// Creates a new resolver.
    pub fn new(store: Arc<dyn RegistryStore>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { store, storage }
    }

    /// Resolves a document version, the current one when `version_number`
    /// is `None`.
    ///
    /// Fails with `UnknownDocument`, `UnknownVersion`, or `NoVersions`.
    pub async fn resolve(
        &self,
        document_id: DocumentId,
        version_number: Option<i32>,
    ) -> Result<ContentRef, AppError> {
        let document = self.store.find_document(document_id).await?.ok_or_else(|| {
            AppError::unknown_document(format!("Document {document_id} not found"))
        })?;

        let version = match version_number {
            Some(number) => self
                .store
                .find_version(document_id, number)
                .await?
                .ok_or_else(|| {
                    AppError::unknown_version(format!(
                        "Document {document_id} has no version {number}"
                    ))
                })?,
            None => self.store.latest_version(document_id).await?.ok_or_else(|| {
                AppError::no_versions(format!("Document {document_id} has no versions"))
            })?,
        };

        Ok(ContentRef {
            document_id,
            version_number: version.version_number,
            stored_filename: version.stored_filename,
            file_size: version.file_size,
            mime_type: PDF_MIME.to_string(),
            original_filename: document.original_filename,
        })
    }

    /// Opens the byte stream behind a content reference.
    ///
    /// Every failure surfaces as `StorageUnavailable`; nothing is retried.
    pub async fn open_stream(&self, content: &ContentRef) -> Result<ByteStream, AppError> {
        debug!(
            document_id = %content.document_id,
            version = content.version_number,
            stored_filename = %content.stored_filename,
            "Opening content stream"
        );
        self.storage
            .read(&content.stored_filename)
            .await
            .map_err(|e| {
                AppError::storage_unavailable(format!(
                    "Content for document {} version {} is unavailable: {}",
                    content.document_id, content.version_number, e.message
                ))
            })
    }
}
