//! Folder creation, lookup, and re-parenting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use docvault_core::error::AppError;
use docvault_core::types::FolderId;
use docvault_database::RegistryStore;
use docvault_entity::folder::{CreateFolder, Folder};

use crate::context::RequestContext;

/// Longest folder name accepted.
pub const MAX_FOLDER_NAME_LEN: usize = 255;

/// Manages the folder hierarchy.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Registry store.
    pub(crate) store: Arc<dyn RegistryStore>,
}

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Parent folder ID (None for root-level).
    pub parent_id: Option<FolderId>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self { store }
    }

    /// Creates a new folder.
    ///
    /// Fails with `InvalidParent` when `parent_id` names a folder that does
    /// not exist.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> Result<Folder, AppError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        if name.chars().count() > MAX_FOLDER_NAME_LEN {
            return Err(AppError::validation(format!(
                "Folder name cannot exceed {MAX_FOLDER_NAME_LEN} characters"
            )));
        }

        let folder = self
            .store
            .insert_folder(&CreateFolder {
                name: name.to_string(),
                description: normalize_optional(req.description),
                parent_id: req.parent_id,
                created_by: ctx.actor.clone(),
            })
            .await?;

        info!(
            actor = %ctx.actor,
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            name = %folder.name,
            "Folder created"
        );

        Ok(folder)
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: FolderId) -> Result<Folder, AppError> {
        self.store
            .find_folder(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Lists every folder ordered by name.
    pub async fn list_folders(&self) -> Result<Vec<Folder>, AppError> {
        self.store.list_folders().await
    }

    /// Lists the children of a folder, or the root folders when `parent` is `None`.
    pub async fn list_children(&self, parent: Option<FolderId>) -> Result<Vec<Folder>, AppError> {
        if let Some(parent_id) = parent {
            self.get_folder(parent_id).await?;
        }
        self.store.list_child_folders(parent).await
    }

    /// Returns the ancestor chain of a folder, root first, ending with the
    /// folder itself.
    pub async fn folder_path(&self, folder_id: FolderId) -> Result<Vec<Folder>, AppError> {
        let chain = self.store.folder_ancestors(folder_id).await?;
        if chain.is_empty() {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }
        Ok(chain)
    }

    /// Moves a folder under a new parent, or to the root when `new_parent`
    /// is `None`.
    ///
    /// Fails with `InvalidParent` if the new parent does not exist or if the
    /// move would make the folder its own ancestor.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_parent: Option<FolderId>,
    ) -> Result<Folder, AppError> {
        let folder = self.store.move_folder(folder_id, new_parent).await?;

        info!(
            actor = %ctx.actor,
            folder_id = %folder_id,
            parent_id = ?new_parent,
            "Folder moved"
        );

        Ok(folder)
    }
}

/// Trim an optional text field, mapping blank input to `None`.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
