//! Folder tree building.

use docvault_core::error::AppError;
use docvault_entity::folder::FolderTree;

use super::service::FolderService;

impl FolderService {
    /// Builds the complete folder forest with per-folder document counts.
    pub async fn folder_tree(&self) -> Result<FolderTree, AppError> {
        let folders = self.store.list_folders().await?;
        if folders.is_empty() {
            return Ok(FolderTree::empty());
        }
        let counts = self.store.count_documents_by_folder().await?;
        Ok(FolderTree::build(&folders, &counts))
    }
}
