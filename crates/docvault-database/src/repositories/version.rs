//! Version repository implementation.

use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::DocumentId;
use docvault_entity::document::version::{CreateVersion, Version};

/// Repository for the append-only version history.
#[derive(Debug, Clone)]
pub struct VersionRepository {
    pool: PgPool,
}

impl VersionRepository {
    /// Create a new version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List versions of a document, oldest first.
    pub async fn find_by_document(&self, document_id: DocumentId) -> AppResult<Vec<Version>> {
        sqlx::query_as::<_, Version>(
            "SELECT * FROM pdf_versions WHERE document_id = $1 ORDER BY version_number ASC",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))
    }

    /// Find a version by number.
    pub async fn find_by_number(
        &self,
        document_id: DocumentId,
        version_number: i32,
    ) -> AppResult<Option<Version>> {
        sqlx::query_as::<_, Version>(
            "SELECT * FROM pdf_versions WHERE document_id = $1 AND version_number = $2",
        )
        .bind(document_id)
        .bind(version_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    /// Find the version with the highest number.
    pub async fn find_latest(&self, document_id: DocumentId) -> AppResult<Option<Version>> {
        sqlx::query_as::<_, Version>(
            "SELECT * FROM pdf_versions WHERE document_id = $1 \
             ORDER BY version_number DESC LIMIT 1",
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find current version", e)
        })
    }

    /// Append the next version of a document.
    ///
    /// The document row is locked for the duration of the transaction, so
    /// concurrent appends to the same document are serialized. The unique
    /// `(document_id, version_number)` key is the backstop.
    pub async fn append(&self, data: &CreateVersion) -> AppResult<Version> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let locked: Option<DocumentId> =
            sqlx::query_scalar("SELECT id FROM pdf_documents WHERE id = $1 FOR UPDATE")
                .bind(data.document_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to lock document", e)
                })?;
        if locked.is_none() {
            return Err(AppError::unknown_document(format!(
                "Document {} not found",
                data.document_id
            )));
        }

        let version = sqlx::query_as::<_, Version>(
            "INSERT INTO pdf_versions \
             (document_id, version_number, stored_filename, file_size, description, created_by) \
             SELECT $1, COALESCE(MAX(version_number), 0) + 1, $2, $3, $4, $5 \
             FROM pdf_versions WHERE document_id = $1 \
             RETURNING *",
        )
        .bind(data.document_id)
        .bind(&data.stored_filename)
        .bind(data.file_size)
        .bind(&data.description)
        .bind(&data.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| append_error(e, data.document_id))?;

        sqlx::query("UPDATE pdf_documents SET updated_at = NOW() WHERE id = $1")
            .bind(data.document_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to touch document", e)
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit version", e)
        })?;

        Ok(version)
    }
}

/// Map an insert failure on `pdf_versions` to the registry error it means.
pub(crate) fn append_error(e: sqlx::Error, document_id: DocumentId) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err)
            if db_err.constraint() == Some("pdf_versions_document_id_version_number_key") =>
        {
            AppError::version_conflict(format!(
                "Concurrent version append on document {document_id}"
            ))
        }
        sqlx::Error::Database(ref db_err)
            if db_err.constraint() == Some("pdf_versions_document_id_fkey") =>
        {
            AppError::unknown_document(format!("Document {document_id} not found"))
        }
        _ => AppError::with_source(ErrorKind::Database, "Failed to append version", e),
    }
}
