//! Registry behaviour over the in-memory store and a temp-dir content store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use docvault_core::config::StorageConfig;
use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::storage::StorageProvider;
use docvault_core::types::{DocumentId, FolderId};
use docvault_database::{
    DocumentStore, FolderStore, MemoryRegistryStore, MetadataStore, RegistryStore, VersionStore,
};
use docvault_entity::document::{
    CreateDocument, CreateVersion, Document, MetadataEntry, Version,
};
use docvault_entity::folder::{CreateFolder, Folder};
use docvault_service::document::{
    AddVersionRequest, RegisterDocumentRequest, UploadDocumentParams, UploadedFile,
};
use docvault_service::folder::CreateFolderRequest;
use docvault_service::{
    ContentResolver, DocumentService, FolderService, MetadataService, RequestContext,
    UploadService, VersionService,
};
use docvault_storage::LocalStorageProvider;

struct Registry {
    store: Arc<dyn RegistryStore>,
    folders: FolderService,
    documents: DocumentService,
    versions: VersionService,
    metadata: MetadataService,
}

impl Registry {
    fn over(store: Arc<dyn RegistryStore>) -> Self {
        Self {
            folders: FolderService::new(store.clone()),
            documents: DocumentService::new(store.clone()),
            versions: VersionService::new(store.clone()),
            metadata: MetadataService::new(store.clone()),
            store,
        }
    }

    fn new() -> Self {
        Self::over(Arc::new(MemoryRegistryStore::new()))
    }

    async fn folder(&self, name: &str, parent: Option<FolderId>) -> AppResult<Folder> {
        self.folders
            .create_folder(
                &ctx(),
                CreateFolderRequest {
                    name: name.to_string(),
                    description: None,
                    parent_id: parent,
                },
            )
            .await
    }

    async fn document(
        &self,
        filename: &str,
        size: i64,
        folder: Option<FolderId>,
    ) -> AppResult<Document> {
        self.documents
            .create_document(
                &ctx(),
                RegisterDocumentRequest {
                    title: filename.trim_end_matches(".pdf").to_string(),
                    description: None,
                    original_filename: filename.to_string(),
                    stored_filename: format!("pdf-0-00000000-{filename}"),
                    file_size: size,
                    folder_id: folder,
                },
            )
            .await
            .map(|created| created.document)
    }

    async fn add(&self, document: DocumentId, filename: &str, size: i64) -> AppResult<Version> {
        self.versions
            .add_version(
                &ctx(),
                AddVersionRequest {
                    document_id: document,
                    stored_filename: format!("pdf-0-00000000-{filename}"),
                    file_size: size,
                    description: None,
                },
            )
            .await
    }
}

fn ctx() -> RequestContext {
    RequestContext::new("tester")
}

fn pdf_bytes(body: &str) -> Bytes {
    Bytes::from(format!("%PDF-1.7\n{body}\n%%EOF"))
}

#[tokio::test]
async fn test_folder_document_version_scenario() {
    let reg = Registry::new();
    let f1 = reg.folder("F1", None).await.unwrap();
    let d1 = reg.document("a.pdf", 100, Some(f1.id)).await.unwrap();

    let v1 = reg.versions.current_version(d1.id).await.unwrap();
    assert_eq!(v1.version_number, 1);
    assert_eq!(v1.file_size, 100);

    let v2 = reg.add(d1.id, "b.pdf", 200).await.unwrap();
    assert_eq!(v2.version_number, 2);

    let current = reg.versions.current_version(d1.id).await.unwrap();
    assert_eq!(current.version_number, 2);
    assert_eq!(current.file_size, 200);

    let listed = reg.documents.list_documents(Some(f1.id)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, d1.id);
}

#[tokio::test]
async fn test_unknown_parent_is_invalid_parent() {
    let reg = Registry::new();
    let err = reg.folder("child", Some(FolderId::new(999))).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidParent);
    assert!(reg.folders.list_folders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_move_cannot_create_cycle() {
    let reg = Registry::new();
    let a = reg.folder("a", None).await.unwrap();
    let b = reg.folder("b", Some(a.id)).await.unwrap();
    let c = reg.folder("c", Some(b.id)).await.unwrap();

    for target in [a.id, b.id, c.id] {
        let err = reg
            .folders
            .move_folder(&ctx(), a.id, Some(target))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParent);
    }

    let err = reg
        .folders
        .move_folder(&ctx(), c.id, Some(FolderId::new(404)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidParent);
}

#[tokio::test]
async fn test_invalid_folder_leaves_no_rows() {
    let reg = Registry::new();
    let err = reg
        .document("ghost.pdf", 10, Some(FolderId::new(7)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidFolder);

    assert!(reg.documents.list_documents(None).await.unwrap().is_empty());
    assert!(reg.store.list_versions(DocumentId::new(1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_current_version_is_maximum() {
    let reg = Registry::new();
    let doc = reg.document("m.pdf", 1, None).await.unwrap();
    for size in 2..=5 {
        reg.add(doc.id, "m.pdf", size).await.unwrap();
    }

    let all = reg.versions.list_versions(doc.id).await.unwrap();
    let max = all.iter().map(|v| v.version_number).max().unwrap();
    let current = reg.versions.current_version(doc.id).await.unwrap();
    assert_eq!(current.version_number, max);
    assert_eq!(current.file_size, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_appends_are_contiguous() {
    let reg = Arc::new(Registry::new());
    let doc_id = reg.document("busy.pdf", 1, None).await.unwrap().id;

    let tasks: Vec<_> = (0..24i64)
        .map(|i| {
            let reg = reg.clone();
            tokio::spawn(async move { reg.add(doc_id, &format!("busy-{i}.pdf"), i).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let numbers: Vec<i32> = reg
        .versions
        .list_versions(doc_id)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.version_number)
        .collect();
    assert_eq!(numbers, (1..=25).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_unknown_document_and_version_errors() {
    let reg = Registry::new();
    let missing = DocumentId::new(31);

    let err = reg.add(missing, "x.pdf", 1).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownDocument);
    let err = reg.versions.current_version(missing).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownDocument);

    let doc = reg.document("y.pdf", 1, None).await.unwrap();
    let err = reg.versions.get_version(doc.id, 9).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownVersion);
}

#[tokio::test]
async fn test_metadata_round_trip_and_last_write_wins() {
    let reg = Registry::new();
    let doc = reg.document("meta.pdf", 1, None).await.unwrap();

    reg.metadata
        .set_metadata(&ctx(), doc.id, "k", Some("v".to_string()))
        .await
        .unwrap();
    let map = reg.metadata.get_metadata(doc.id).await.unwrap();
    assert_eq!(map.get("k"), Some(&Some("v".to_string())));

    reg.metadata
        .set_metadata(&ctx(), doc.id, "k", Some("w".to_string()))
        .await
        .unwrap();
    reg.metadata.set_metadata(&ctx(), doc.id, "empty", None).await.unwrap();

    let map = reg.metadata.get_metadata(doc.id).await.unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("k"), Some(&Some("w".to_string())));
    assert_eq!(map.get("empty"), Some(&None));

    let err = reg.metadata.get_entry(doc.id, "absent").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = reg
        .metadata
        .get_metadata(DocumentId::new(404))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownDocument);
}

/// Store wrapper that injects registry faults and delegates everything
/// else to the memory store.
///
/// The first `conflicts` appends report a version conflict. With
/// `hide_versions` set, `latest_version` finds nothing.
#[derive(Debug)]
struct FaultyStore {
    inner: MemoryRegistryStore,
    conflicts: usize,
    hide_versions: bool,
    attempts: AtomicUsize,
}

impl FaultyStore {
    fn conflicting(conflicts: usize) -> Self {
        Self {
            inner: MemoryRegistryStore::new(),
            conflicts,
            hide_versions: false,
            attempts: AtomicUsize::new(0),
        }
    }

    fn versionless() -> Self {
        Self {
            hide_versions: true,
            ..Self::conflicting(0)
        }
    }
}

#[async_trait]
impl FolderStore for FaultyStore {
    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        self.inner.insert_folder(data).await
    }
    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        self.inner.find_folder(id).await
    }
    async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        self.inner.list_folders().await
    }
    async fn list_child_folders(&self, parent: Option<FolderId>) -> AppResult<Vec<Folder>> {
        self.inner.list_child_folders(parent).await
    }
    async fn folder_ancestors(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        self.inner.folder_ancestors(id).await
    }
    async fn move_folder(&self, id: FolderId, new_parent: Option<FolderId>) -> AppResult<Folder> {
        self.inner.move_folder(id, new_parent).await
    }
    async fn count_documents_by_folder(&self) -> AppResult<HashMap<FolderId, u64>> {
        self.inner.count_documents_by_folder().await
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn insert_document(&self, data: &CreateDocument) -> AppResult<(Document, Version)> {
        self.inner.insert_document(data).await
    }
    async fn find_document(&self, id: DocumentId) -> AppResult<Option<Document>> {
        self.inner.find_document(id).await
    }
    async fn list_documents(&self, folder: Option<FolderId>) -> AppResult<Vec<Document>> {
        self.inner.list_documents(folder).await
    }
}

#[async_trait]
impl VersionStore for FaultyStore {
    async fn append_version(&self, data: &CreateVersion) -> AppResult<Version> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) < self.conflicts {
            return Err(AppError::version_conflict("simulated race"));
        }
        self.inner.append_version(data).await
    }
    async fn latest_version(&self, document: DocumentId) -> AppResult<Option<Version>> {
        if self.hide_versions {
            return Ok(None);
        }
        self.inner.latest_version(document).await
    }
    async fn find_version(&self, document: DocumentId, number: i32) -> AppResult<Option<Version>> {
        self.inner.find_version(document, number).await
    }
    async fn list_versions(&self, document: DocumentId) -> AppResult<Vec<Version>> {
        self.inner.list_versions(document).await
    }
}

#[async_trait]
impl MetadataStore for FaultyStore {
    async fn upsert_metadata(
        &self,
        document: DocumentId,
        key: &str,
        value: Option<&str>,
    ) -> AppResult<MetadataEntry> {
        self.inner.upsert_metadata(document, key, value).await
    }
    async fn find_metadata(
        &self,
        document: DocumentId,
        key: &str,
    ) -> AppResult<Option<MetadataEntry>> {
        self.inner.find_metadata(document, key).await
    }
    async fn list_metadata(&self, document: DocumentId) -> AppResult<Vec<MetadataEntry>> {
        self.inner.list_metadata(document).await
    }
}

#[async_trait]
impl RegistryStore for FaultyStore {
    fn backend(&self) -> &'static str {
        "faulty"
    }
    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[tokio::test]
async fn test_version_conflict_is_retried_once() {
    let store = Arc::new(FaultyStore::conflicting(1));
    let reg = Registry::over(store.clone());
    let doc = reg.document("race.pdf", 1, None).await.unwrap();

    let version = reg.add(doc.id, "race2.pdf", 2).await.unwrap();
    assert_eq!(version.version_number, 2);
    assert_eq!(store.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_second_version_conflict_surfaces() {
    let store = Arc::new(FaultyStore::conflicting(2));
    let reg = Registry::over(store.clone());
    let doc = reg.document("race.pdf", 1, None).await.unwrap();

    let err = reg.add(doc.id, "race2.pdf", 2).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::VersionConflict);
    assert_eq!(store.attempts.load(Ordering::SeqCst), 2);
    assert_eq!(reg.versions.list_versions(doc.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_document_without_versions_reports_no_versions() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(LocalStorageProvider::new(dir.path()).await.unwrap());
    let store: Arc<dyn RegistryStore> = Arc::new(FaultyStore::versionless());
    let reg = Registry::over(store.clone());
    let resolver = ContentResolver::new(store, storage);
    let doc = reg.document("bare.pdf", 3, None).await.unwrap();

    let err = reg.versions.current_version(doc.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoVersions);
    let err = resolver.resolve(doc.id, None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoVersions);

    // Pinned lookups do not consult the current version.
    let pinned = resolver.resolve(doc.id, Some(1)).await.unwrap();
    assert_eq!(pinned.version_number, 1);
}

struct Content {
    _dir: tempfile::TempDir,
    reg: Registry,
    storage: Arc<LocalStorageProvider>,
    uploads: UploadService,
    resolver: ContentResolver,
}

async fn content_setup(max_upload: u64) -> Content {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(LocalStorageProvider::new(dir.path()).await.unwrap());
    let reg = Registry::new();
    let config = StorageConfig {
        max_upload_size_bytes: max_upload,
        ..StorageConfig::default()
    };
    let uploads = UploadService::new(
        reg.documents.clone(),
        reg.versions.clone(),
        storage.clone(),
        config,
    );
    let resolver = ContentResolver::new(reg.store.clone(), storage.clone());
    Content {
        _dir: dir,
        reg,
        storage,
        uploads,
        resolver,
    }
}

fn upload(filename: &str, data: Bytes) -> UploadedFile {
    UploadedFile {
        filename: filename.to_string(),
        content_type: Some("application/pdf".to_string()),
        data,
    }
}

async fn read_all(resolver: &ContentResolver, document: DocumentId, version: Option<i32>) -> Vec<u8> {
    let content = resolver.resolve(document, version).await.unwrap();
    let mut stream = resolver.open_stream(&content).await.unwrap();
    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.extend_from_slice(&chunk.unwrap());
    }
    out
}

#[tokio::test]
async fn test_resolve_follows_new_versions() {
    let c = content_setup(1024 * 1024).await;
    let created = c
        .uploads
        .upload_document(
            &ctx(),
            UploadDocumentParams {
                file: upload("Quarterly Report.pdf", pdf_bytes("one")),
                title: None,
                description: None,
                folder_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.document.title, "Quarterly Report");
    let doc = created.document.id;

    let first = c.resolver.resolve(doc, None).await.unwrap();
    assert_eq!(first.version_number, 1);
    assert_eq!(first.mime_type, "application/pdf");
    assert_eq!(first.original_filename, "Quarterly Report.pdf");

    c.uploads
        .upload_version(&ctx(), doc, upload("v2.pdf", pdf_bytes("two")), None)
        .await
        .unwrap();

    let fresh = c.resolver.resolve(doc, None).await.unwrap();
    assert_eq!(fresh.version_number, 2);
    assert_ne!(fresh.stored_filename, first.stored_filename);
    assert_eq!(read_all(&c.resolver, doc, None).await, pdf_bytes("two").to_vec());
    assert_eq!(read_all(&c.resolver, doc, Some(1)).await, pdf_bytes("one").to_vec());

    let err = c.resolver.resolve(doc, Some(3)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownVersion);
    let err = c.resolver.resolve(DocumentId::new(99), None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownDocument);
}

#[tokio::test]
async fn test_missing_blob_is_storage_unavailable() {
    let c = content_setup(1024).await;
    let doc = c.reg.document("lost.pdf", 10, None).await.unwrap();

    let content = c.resolver.resolve(doc.id, None).await.unwrap();
    let err = c.resolver.open_stream(&content).await.err().unwrap();
    assert_eq!(err.kind, ErrorKind::StorageUnavailable);
}

#[tokio::test]
async fn test_upload_rejections_write_nothing() {
    let c = content_setup(64).await;

    let not_pdf = UploadedFile {
        filename: "notes.txt".to_string(),
        content_type: Some("text/plain".to_string()),
        data: Bytes::from_static(b"plain text"),
    };
    let params = |file: UploadedFile, folder: Option<FolderId>| UploadDocumentParams {
        file,
        title: None,
        description: None,
        folder_id: folder,
    };

    let err = c.uploads.upload_document(&ctx(), params(not_pdf, None)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let fake = upload("fake.pdf", Bytes::from_static(b"PK\x03\x04 zip"));
    let err = c.uploads.upload_document(&ctx(), params(fake, None)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let empty = upload("empty.pdf", Bytes::new());
    let err = c.uploads.upload_document(&ctx(), params(empty, None)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let big = upload("big.pdf", pdf_bytes(&"x".repeat(128)));
    let err = c.uploads.upload_document(&ctx(), params(big, None)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::PayloadTooLarge);

    let homeless = upload("a.pdf", pdf_bytes("a"));
    let err = c
        .uploads
        .upload_document(&ctx(), params(homeless, Some(FolderId::new(12))))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidFolder);

    let err = c
        .uploads
        .upload_version(&ctx(), DocumentId::new(5), upload("b.pdf", pdf_bytes("b")), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownDocument);

    assert!(c.reg.documents.list_documents(None).await.unwrap().is_empty());
    let leftovers = std::fs::read_dir(c.storage.root()).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_content_type_is_pdf_whatever_the_filename() {
    let c = content_setup(1024 * 1024).await;
    let created = c
        .uploads
        .upload_document(
            &ctx(),
            UploadDocumentParams {
                file: upload("scan.png", pdf_bytes("scan")),
                title: None,
                description: None,
                folder_id: None,
            },
        )
        .await
        .unwrap();

    let content = c.resolver.resolve(created.document.id, None).await.unwrap();
    assert_eq!(content.original_filename, "scan.png");
    assert_eq!(content.mime_type, "application/pdf");
}

#[tokio::test]
async fn test_overlong_filename_is_rejected_before_writing() {
    let c = content_setup(1024 * 1024).await;
    let filename = format!("{}.pdf", "n".repeat(252));

    let err = c
        .uploads
        .upload_document(
            &ctx(),
            UploadDocumentParams {
                file: upload(&filename, pdf_bytes("long")),
                title: Some("Long name".to_string()),
                description: None,
                folder_id: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(c.reg.documents.list_documents(None).await.unwrap().is_empty());
    assert_eq!(std::fs::read_dir(c.storage.root()).unwrap().count(), 0);

    let err = c.reg.document(&filename, 1, None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let fits = format!("{}.pdf", "n".repeat(251));
    assert!(c.reg.document(&fits, 1, None).await.is_ok());
}
