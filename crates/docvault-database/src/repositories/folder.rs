//! Folder repository implementation.

use std::collections::HashMap;

use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::FolderId;
use docvault_entity::folder::model::{CreateFolder, Folder};

/// Advisory lock key serializing structural changes to the folder tree.
const FOLDER_TREE_LOCK: i64 = 0x646f_6376_6661_6c74;

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// List every folder ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders ORDER BY name ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// List direct children of a folder, or the roots when `parent_id` is `None`.
    pub async fn find_children(&self, parent_id: Option<FolderId>) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE parent_id IS NOT DISTINCT FROM $1 \
             ORDER BY name ASC, id ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    /// Get the ancestor chain from the root down to the folder itself.
    pub async fn find_ancestors(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "WITH RECURSIVE ancestors AS ( \
                SELECT f.*, 0 AS depth FROM folders f WHERE f.id = $1 \
                UNION ALL \
                SELECT f.*, a.depth + 1 FROM folders f INNER JOIN ancestors a ON f.id = a.parent_id \
             ) SELECT id, name, description, parent_id, created_at, updated_at, created_by \
               FROM ancestors ORDER BY depth DESC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ancestors", e))
    }

    /// Create a new folder.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name, description, parent_id, created_by) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.parent_id)
        .bind(&data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("folders_parent_id_fkey") =>
            {
                AppError::invalid_parent(format!(
                    "Parent folder {} does not exist",
                    display_parent(data.parent_id)
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })
    }

    /// Move a folder under a new parent (or to the root).
    ///
    /// Runs under a transaction-scoped advisory lock so that two concurrent
    /// moves cannot jointly produce a cycle.
    pub async fn move_to(&self, id: FolderId, new_parent: Option<FolderId>) -> AppResult<Folder> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(FOLDER_TREE_LOCK)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to lock folder tree", e)
            })?;

        let exists: Option<FolderId> = sqlx::query_scalar("SELECT id FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))?;
        if exists.is_none() {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }

        if let Some(parent) = new_parent {
            if parent == id {
                return Err(AppError::invalid_parent(format!(
                    "Folder {id} cannot be its own parent"
                )));
            }

            // Walk up from the proposed parent; meeting `id` means a cycle.
            let chain: Vec<FolderId> = sqlx::query_scalar(
                "WITH RECURSIVE chain AS ( \
                    SELECT id, parent_id FROM folders WHERE id = $1 \
                    UNION ALL \
                    SELECT f.id, f.parent_id FROM folders f INNER JOIN chain c ON f.id = c.parent_id \
                 ) SELECT id FROM chain",
            )
            .bind(parent)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to walk folder ancestry", e)
            })?;

            if chain.is_empty() {
                return Err(AppError::invalid_parent(format!(
                    "Parent folder {parent} does not exist"
                )));
            }
            if chain.contains(&id) {
                return Err(AppError::invalid_parent(format!(
                    "Moving folder {id} under {parent} would create a cycle"
                )));
            }
        }

        let folder = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(new_parent)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move folder", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder move", e)
        })?;

        Ok(folder)
    }

    /// Count documents per folder.
    pub async fn document_counts(&self) -> AppResult<HashMap<FolderId, u64>> {
        let rows = sqlx::query_as::<_, (FolderId, i64)>(
            "SELECT folder_id, COUNT(*) FROM pdf_documents \
             WHERE folder_id IS NOT NULL GROUP BY folder_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count folder documents", e)
        })?;

        Ok(rows
            .into_iter()
            .map(|(folder, count)| (folder, count.max(0) as u64))
            .collect())
    }
}

fn display_parent(parent: Option<FolderId>) -> String {
    parent.map(|p| p.to_string()).unwrap_or_else(|| "<none>".to_string())
}
