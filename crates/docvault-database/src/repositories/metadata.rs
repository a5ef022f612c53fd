//! Metadata repository implementation.

use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::DocumentId;
use docvault_entity::document::metadata::MetadataEntry;

/// Repository for per-document key/value metadata.
#[derive(Debug, Clone)]
pub struct MetadataRepository {
    pool: PgPool,
}

impl MetadataRepository {
    /// Create a new metadata repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List entries of a document ordered by key.
    pub async fn find_by_document(&self, document_id: DocumentId) -> AppResult<Vec<MetadataEntry>> {
        sqlx::query_as::<_, MetadataEntry>(
            "SELECT * FROM pdf_metadata WHERE document_id = $1 ORDER BY key ASC",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list metadata", e))
    }

    /// Find one entry.
    pub async fn find(&self, document_id: DocumentId, key: &str) -> AppResult<Option<MetadataEntry>> {
        sqlx::query_as::<_, MetadataEntry>(
            "SELECT * FROM pdf_metadata WHERE document_id = $1 AND key = $2",
        )
        .bind(document_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find metadata", e))
    }

    /// Insert or overwrite an entry. Last write wins.
    pub async fn upsert(
        &self,
        document_id: DocumentId,
        key: &str,
        value: Option<&str>,
    ) -> AppResult<MetadataEntry> {
        sqlx::query_as::<_, MetadataEntry>(
            "INSERT INTO pdf_metadata (document_id, key, value) VALUES ($1, $2, $3) \
             ON CONFLICT (document_id, key) \
             DO UPDATE SET value = EXCLUDED.value, updated_at = NOW() \
             RETURNING *",
        )
        .bind(document_id)
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("pdf_metadata_document_id_fkey") =>
            {
                AppError::unknown_document(format!("Document {document_id} not found"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to set metadata", e),
        })
    }
}
