//! PostgreSQL-backed registry store.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId};
use docvault_entity::document::{
    CreateDocument, CreateVersion, Document, MetadataEntry, Version,
};
use docvault_entity::folder::{CreateFolder, Folder};

use super::{DocumentStore, FolderStore, MetadataStore, RegistryStore, VersionStore};
use crate::connection::DatabasePool;
use crate::repositories::{
    DocumentRepository, FolderRepository, MetadataRepository, VersionRepository,
};

/// Registry store composed of the per-entity PostgreSQL repositories.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    db: DatabasePool,
    folders: FolderRepository,
    documents: DocumentRepository,
    versions: VersionRepository,
    metadata: MetadataRepository,
}

impl PostgresStore {
    /// Build the store on top of a connected pool.
    pub fn new(db: DatabasePool) -> Self {
        let pool: PgPool = db.pool().clone();
        Self {
            folders: FolderRepository::new(pool.clone()),
            documents: DocumentRepository::new(pool.clone()),
            versions: VersionRepository::new(pool.clone()),
            metadata: MetadataRepository::new(pool),
            db,
        }
    }
}

#[async_trait]
impl FolderStore for PostgresStore {
    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        self.folders.create(data).await
    }

    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        self.folders.find_by_id(id).await
    }

    async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        self.folders.find_all().await
    }

    async fn list_child_folders(&self, parent: Option<FolderId>) -> AppResult<Vec<Folder>> {
        self.folders.find_children(parent).await
    }

    async fn folder_ancestors(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        self.folders.find_ancestors(id).await
    }

    async fn move_folder(&self, id: FolderId, new_parent: Option<FolderId>) -> AppResult<Folder> {
        self.folders.move_to(id, new_parent).await
    }

    async fn count_documents_by_folder(&self) -> AppResult<HashMap<FolderId, u64>> {
        self.folders.document_counts().await
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn insert_document(&self, data: &CreateDocument) -> AppResult<(Document, Version)> {
        self.documents.create_with_initial_version(data).await
    }

    async fn find_document(&self, id: DocumentId) -> AppResult<Option<Document>> {
        self.documents.find_by_id(id).await
    }

    async fn list_documents(&self, folder: Option<FolderId>) -> AppResult<Vec<Document>> {
        self.documents.find_all(folder).await
    }
}

#[async_trait]
impl VersionStore for PostgresStore {
    async fn append_version(&self, data: &CreateVersion) -> AppResult<Version> {
        self.versions.append(data).await
    }

    async fn latest_version(&self, document: DocumentId) -> AppResult<Option<Version>> {
        self.versions.find_latest(document).await
    }

    async fn find_version(&self, document: DocumentId, number: i32) -> AppResult<Option<Version>> {
        self.versions.find_by_number(document, number).await
    }

    async fn list_versions(&self, document: DocumentId) -> AppResult<Vec<Version>> {
        self.versions.find_by_document(document).await
    }
}

#[async_trait]
impl MetadataStore for PostgresStore {
    async fn upsert_metadata(
        &self,
        document: DocumentId,
        key: &str,
        value: Option<&str>,
    ) -> AppResult<MetadataEntry> {
        self.metadata.upsert(document, key, value).await
    }

    async fn find_metadata(
        &self,
        document: DocumentId,
        key: &str,
    ) -> AppResult<Option<MetadataEntry>> {
        self.metadata.find(document, key).await
    }

    async fn list_metadata(&self, document: DocumentId) -> AppResult<Vec<MetadataEntry>> {
        self.metadata.find_by_document(document).await
    }
}

#[async_trait]
impl RegistryStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }

    async fn close(&self) {
        self.db.close().await;
    }
}
