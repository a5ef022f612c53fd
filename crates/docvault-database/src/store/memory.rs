//! Volatile in-process registry store.
//!
//! All tables live behind one `tokio::sync::RwLock`; every mutation runs
//! under the write guard, which makes each operation atomic and serializes
//! version appends. The store is owned by whoever constructs it; there is
//! no process-wide instance.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId, MetadataEntryId, VersionId};
use docvault_entity::document::{
    CreateDocument, CreateVersion, Document, MetadataEntry, Version,
};
use docvault_entity::folder::{CreateFolder, Folder};

use super::{DocumentStore, FolderStore, MetadataStore, RegistryStore, VersionStore};

#[derive(Debug, Default)]
struct Tables {
    folders: BTreeMap<FolderId, Folder>,
    documents: BTreeMap<DocumentId, Document>,
    versions: BTreeMap<DocumentId, Vec<Version>>,
    metadata: BTreeMap<DocumentId, BTreeMap<String, MetadataEntry>>,
    last_folder_id: i64,
    last_document_id: i64,
    last_version_id: i64,
    last_metadata_id: i64,
}

impl Tables {
    /// Walk from `start` to the root, returning the chain nearest-first.
    fn ancestry(&self, start: FolderId) -> Vec<&Folder> {
        let mut chain = Vec::new();
        let mut cursor = self.folders.get(&start);
        while let Some(folder) = cursor {
            // The tree is acyclic, the bound only guards corrupted state.
            if chain.len() > self.folders.len() {
                break;
            }
            chain.push(folder);
            cursor = folder.parent_id.and_then(|p| self.folders.get(&p));
        }
        chain
    }

    fn next_version(&mut self, data: &CreateVersion) -> Version {
        self.last_version_id += 1;
        let number = self
            .versions
            .get(&data.document_id)
            .and_then(|list| list.last())
            .map_or(1, |v| v.version_number + 1);
        Version {
            id: VersionId::new(self.last_version_id),
            document_id: data.document_id,
            version_number: number,
            stored_filename: data.stored_filename.clone(),
            file_size: data.file_size,
            description: data.description.clone(),
            created_at: Utc::now(),
            created_by: data.created_by.clone(),
        }
    }
}

/// In-memory [`RegistryStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryRegistryStore {
    tables: RwLock<Tables>,
}

impl MemoryRegistryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_name(a: &&Folder, b: &&Folder) -> std::cmp::Ordering {
    a.name.cmp(&b.name).then(a.id.cmp(&b.id))
}

#[async_trait]
impl FolderStore for MemoryRegistryStore {
    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut tables = self.tables.write().await;
        if let Some(parent) = data.parent_id {
            if !tables.folders.contains_key(&parent) {
                return Err(AppError::invalid_parent(format!(
                    "Parent folder {parent} does not exist"
                )));
            }
        }

        tables.last_folder_id += 1;
        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(tables.last_folder_id),
            name: data.name.clone(),
            description: data.description.clone(),
            parent_id: data.parent_id,
            created_at: now,
            updated_at: now,
            created_by: data.created_by.clone(),
        };
        tables.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.tables.read().await.folders.get(&id).cloned())
    }

    async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        let tables = self.tables.read().await;
        let mut folders: Vec<&Folder> = tables.folders.values().collect();
        folders.sort_by(by_name);
        Ok(folders.into_iter().cloned().collect())
    }

    async fn list_child_folders(&self, parent: Option<FolderId>) -> AppResult<Vec<Folder>> {
        let tables = self.tables.read().await;
        let mut folders: Vec<&Folder> = tables
            .folders
            .values()
            .filter(|f| f.parent_id == parent)
            .collect();
        folders.sort_by(by_name);
        Ok(folders.into_iter().cloned().collect())
    }

    async fn folder_ancestors(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        let tables = self.tables.read().await;
        Ok(tables.ancestry(id).into_iter().rev().cloned().collect())
    }

    async fn move_folder(&self, id: FolderId, new_parent: Option<FolderId>) -> AppResult<Folder> {
        let mut tables = self.tables.write().await;
        if !tables.folders.contains_key(&id) {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }

        if let Some(parent) = new_parent {
            let chain = tables.ancestry(parent);
            if chain.is_empty() {
                return Err(AppError::invalid_parent(format!(
                    "Parent folder {parent} does not exist"
                )));
            }
            if chain.iter().any(|f| f.id == id) {
                return Err(AppError::invalid_parent(format!(
                    "Moving folder {id} under {parent} would create a cycle"
                )));
            }
        }

        let folder = tables
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        folder.parent_id = new_parent;
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    async fn count_documents_by_folder(&self) -> AppResult<HashMap<FolderId, u64>> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for folder in tables.documents.values().filter_map(|d| d.folder_id) {
            *counts.entry(folder).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[async_trait]
impl DocumentStore for MemoryRegistryStore {
    async fn insert_document(&self, data: &CreateDocument) -> AppResult<(Document, Version)> {
        let mut tables = self.tables.write().await;
        if let Some(folder) = data.folder_id {
            if !tables.folders.contains_key(&folder) {
                return Err(AppError::invalid_folder(format!(
                    "Folder {folder} does not exist"
                )));
            }
        }

        tables.last_document_id += 1;
        let now = Utc::now();
        let document = Document {
            id: DocumentId::new(tables.last_document_id),
            title: data.title.clone(),
            description: data.description.clone(),
            original_filename: data.original_filename.clone(),
            stored_filename: data.stored_filename.clone(),
            file_size: data.file_size,
            folder_id: data.folder_id,
            created_at: now,
            updated_at: now,
            created_by: data.created_by.clone(),
        };
        let version = tables.next_version(&CreateVersion {
            document_id: document.id,
            stored_filename: data.stored_filename.clone(),
            file_size: data.file_size,
            description: None,
            created_by: data.created_by.clone(),
        });

        tables.documents.insert(document.id, document.clone());
        tables.versions.insert(document.id, vec![version.clone()]);
        debug!(document_id = %document.id, "Inserted document into memory store");
        Ok((document, version))
    }

    async fn find_document(&self, id: DocumentId) -> AppResult<Option<Document>> {
        Ok(self.tables.read().await.documents.get(&id).cloned())
    }

    async fn list_documents(&self, folder: Option<FolderId>) -> AppResult<Vec<Document>> {
        let tables = self.tables.read().await;
        let mut documents: Vec<Document> = tables
            .documents
            .values()
            .filter(|d| folder.is_none() || d.folder_id == folder)
            .cloned()
            .collect();
        documents.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(documents)
    }
}

#[async_trait]
impl VersionStore for MemoryRegistryStore {
    async fn append_version(&self, data: &CreateVersion) -> AppResult<Version> {
        let mut tables = self.tables.write().await;
        if !tables.documents.contains_key(&data.document_id) {
            return Err(AppError::unknown_document(format!(
                "Document {} not found",
                data.document_id
            )));
        }

        let version = tables.next_version(data);
        tables
            .versions
            .entry(data.document_id)
            .or_default()
            .push(version.clone());
        if let Some(document) = tables.documents.get_mut(&data.document_id) {
            document.updated_at = version.created_at;
        }
        Ok(version)
    }

    async fn latest_version(&self, document: DocumentId) -> AppResult<Option<Version>> {
        let tables = self.tables.read().await;
        Ok(tables
            .versions
            .get(&document)
            .and_then(|list| list.last())
            .cloned())
    }

    async fn find_version(&self, document: DocumentId, number: i32) -> AppResult<Option<Version>> {
        let tables = self.tables.read().await;
        Ok(tables
            .versions
            .get(&document)
            .and_then(|list| list.iter().find(|v| v.version_number == number))
            .cloned())
    }

    async fn list_versions(&self, document: DocumentId) -> AppResult<Vec<Version>> {
        let tables = self.tables.read().await;
        Ok(tables.versions.get(&document).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl MetadataStore for MemoryRegistryStore {
    async fn upsert_metadata(
        &self,
        document: DocumentId,
        key: &str,
        value: Option<&str>,
    ) -> AppResult<MetadataEntry> {
        let mut tables = self.tables.write().await;
        if !tables.documents.contains_key(&document) {
            return Err(AppError::unknown_document(format!(
                "Document {document} not found"
            )));
        }

        let now = Utc::now();
        let existing = tables
            .metadata
            .get(&document)
            .and_then(|entries| entries.get(key))
            .cloned();
        let entry = match existing {
            Some(mut entry) => {
                entry.value = value.map(str::to_string);
                entry.updated_at = now;
                entry
            }
            None => {
                tables.last_metadata_id += 1;
                MetadataEntry {
                    id: MetadataEntryId::new(tables.last_metadata_id),
                    document_id: document,
                    key: key.to_string(),
                    value: value.map(str::to_string),
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        tables
            .metadata
            .entry(document)
            .or_default()
            .insert(key.to_string(), entry.clone());
        Ok(entry)
    }

    async fn find_metadata(
        &self,
        document: DocumentId,
        key: &str,
    ) -> AppResult<Option<MetadataEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .metadata
            .get(&document)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn list_metadata(&self, document: DocumentId) -> AppResult<Vec<MetadataEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .metadata
            .get(&document)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl RegistryStore for MemoryRegistryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
