//! Document repository implementation.

use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId};
use docvault_entity::document::model::{CreateDocument, Document};
use docvault_entity::document::version::Version;

/// Repository for document registration and listing.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a document by ID.
    pub async fn find_by_id(&self, id: DocumentId) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM pdf_documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    /// List documents in insertion order, optionally within one folder.
    pub async fn find_all(&self, folder_id: Option<FolderId>) -> AppResult<Vec<Document>> {
        let query = match folder_id {
            Some(folder) => sqlx::query_as::<_, Document>(
                "SELECT * FROM pdf_documents WHERE folder_id = $1 ORDER BY created_at ASC, id ASC",
            )
            .bind(folder),
            None => sqlx::query_as::<_, Document>(
                "SELECT * FROM pdf_documents ORDER BY created_at ASC, id ASC",
            ),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))
    }

    /// Insert a document and its version 1 in a single transaction.
    pub async fn create_with_initial_version(
        &self,
        data: &CreateDocument,
    ) -> AppResult<(Document, Version)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        if let Some(folder) = data.folder_id {
            // FOR SHARE keeps the folder row alive until commit.
            let found: Option<FolderId> =
                sqlx::query_scalar("SELECT id FROM folders WHERE id = $1 FOR SHARE")
                    .bind(folder)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to find folder", e)
                    })?;
            if found.is_none() {
                return Err(AppError::invalid_folder(format!(
                    "Folder {folder} does not exist"
                )));
            }
        }

        let document = sqlx::query_as::<_, Document>(
            "INSERT INTO pdf_documents \
             (title, description, original_filename, stored_filename, file_size, folder_id, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.original_filename)
        .bind(&data.stored_filename)
        .bind(data.file_size)
        .bind(data.folder_id)
        .bind(&data.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("pdf_documents_folder_id_fkey") =>
            {
                AppError::invalid_folder("Folder does not exist")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create document", e),
        })?;

        let version = sqlx::query_as::<_, Version>(
            "INSERT INTO pdf_versions \
             (document_id, version_number, stored_filename, file_size, created_by) \
             VALUES ($1, 1, $2, $3, $4) RETURNING *",
        )
        .bind(document.id)
        .bind(&document.stored_filename)
        .bind(document.file_size)
        .bind(&data.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create initial version", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit document", e)
        })?;

        Ok((document, version))
    }
}
