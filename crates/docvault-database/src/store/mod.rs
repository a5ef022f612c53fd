//! The registry store abstraction.
//!
//! Services hold an `Arc<dyn RegistryStore>` and never talk to a concrete
//! backend. Every mutating operation is atomic in every implementation:
//! PostgreSQL uses transactions and row locks, the memory store runs each
//! mutation under a single write guard.

pub mod memory;
pub mod postgres;

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;

use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId};
use docvault_entity::document::{
    CreateDocument, CreateVersion, Document, MetadataEntry, Version,
};
use docvault_entity::folder::{CreateFolder, Folder};

/// Folder persistence.
#[async_trait]
pub trait FolderStore: Send + Sync + Debug {
    /// Insert a folder. Fails with `InvalidParent` if the parent is missing.
    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Find a folder by ID.
    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// All folders ordered by name.
    async fn list_folders(&self) -> AppResult<Vec<Folder>>;

    /// Direct children of `parent` (roots when `None`), ordered by name.
    async fn list_child_folders(&self, parent: Option<FolderId>) -> AppResult<Vec<Folder>>;

    /// Ancestor chain from the root down to and including `id`.
    /// Empty when the folder does not exist.
    async fn folder_ancestors(&self, id: FolderId) -> AppResult<Vec<Folder>>;

    /// Re-parent a folder.
    ///
    /// Fails with `NotFound` if the folder is missing and with
    /// `InvalidParent` if the new parent is missing or is the folder itself
    /// or one of its descendants. The check and the update are atomic.
    async fn move_folder(&self, id: FolderId, new_parent: Option<FolderId>) -> AppResult<Folder>;

    /// Number of documents directly inside each non-empty folder.
    async fn count_documents_by_folder(&self) -> AppResult<HashMap<FolderId, u64>>;
}

/// Document persistence.
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    /// Insert a document together with its version 1 in one atomic step.
    ///
    /// Fails with `InvalidFolder` if `folder_id` is set and unknown, in which
    /// case nothing is written.
    async fn insert_document(&self, data: &CreateDocument) -> AppResult<(Document, Version)>;

    /// Find a document by ID.
    async fn find_document(&self, id: DocumentId) -> AppResult<Option<Document>>;

    /// Documents ordered by creation time (ID breaks ties), optionally
    /// restricted to one folder.
    async fn list_documents(&self, folder: Option<FolderId>) -> AppResult<Vec<Document>>;
}

/// Version persistence.
#[async_trait]
pub trait VersionStore: Send + Sync + Debug {
    /// Append a version numbered `max(existing) + 1`.
    ///
    /// Fails with `UnknownDocument` if the document is missing and with
    /// `VersionConflict` if a concurrent writer claimed the same number.
    /// Bumps the document's `updated_at`.
    async fn append_version(&self, data: &CreateVersion) -> AppResult<Version>;

    /// The version with the highest number, if any.
    async fn latest_version(&self, document: DocumentId) -> AppResult<Option<Version>>;

    /// A specific version by number.
    async fn find_version(&self, document: DocumentId, number: i32) -> AppResult<Option<Version>>;

    /// All versions of a document in ascending order.
    async fn list_versions(&self, document: DocumentId) -> AppResult<Vec<Version>>;
}

/// Metadata persistence.
#[async_trait]
pub trait MetadataStore: Send + Sync + Debug {
    /// Set `key` to `value`, overwriting any previous value in place.
    /// Fails with `UnknownDocument` if the document is missing.
    async fn upsert_metadata(
        &self,
        document: DocumentId,
        key: &str,
        value: Option<&str>,
    ) -> AppResult<MetadataEntry>;

    /// A single entry.
    async fn find_metadata(&self, document: DocumentId, key: &str)
    -> AppResult<Option<MetadataEntry>>;

    /// All entries of a document ordered by key.
    async fn list_metadata(&self, document: DocumentId) -> AppResult<Vec<MetadataEntry>>;
}

/// The full registry store consumed by the service layer.
#[async_trait]
pub trait RegistryStore: FolderStore + DocumentStore + VersionStore + MetadataStore {
    /// Backend name for logs and health output (e.g., "postgres").
    fn backend(&self) -> &'static str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Release backend resources once the server has drained.
    async fn close(&self) {}
}
