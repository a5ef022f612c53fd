//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_database::RegistryStore;
use docvault_service::{
    ContentResolver, DocumentService, FolderService, MetadataService, UploadService,
    VersionService,
};
use docvault_storage::manager::StorageManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// When the state was built
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// Registry store (PostgreSQL or in-memory)
    pub store: Arc<dyn RegistryStore>,
    /// Content store provider manager
    pub storage_manager: Arc<StorageManager>,

    // ── Services ─────────────────────────────────────────────
    /// Folder service
    pub folder_service: Arc<FolderService>,
    /// Document service
    pub document_service: Arc<DocumentService>,
    /// Version service
    pub version_service: Arc<VersionService>,
    /// Metadata service
    pub metadata_service: Arc<MetadataService>,
    /// Upload service
    pub upload_service: Arc<UploadService>,
    /// Content resolver
    pub content_resolver: Arc<ContentResolver>,
}

impl AppState {
    /// Wires every service over the given registry store and the manager's
    /// default content store.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn RegistryStore>,
        storage_manager: Arc<StorageManager>,
    ) -> Result<Self, AppError> {
        let content_store = storage_manager.default_provider()?;

        let folder_service = FolderService::new(Arc::clone(&store));
        let document_service = DocumentService::new(Arc::clone(&store));
        let version_service = VersionService::new(Arc::clone(&store));
        let metadata_service = MetadataService::new(Arc::clone(&store));
        let upload_service = UploadService::new(
            document_service.clone(),
            version_service.clone(),
            Arc::clone(&content_store),
            config.storage.clone(),
        );
        let content_resolver = ContentResolver::new(Arc::clone(&store), content_store);

        Ok(Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            store,
            storage_manager,
            folder_service: Arc::new(folder_service),
            document_service: Arc::new(document_service),
            version_service: Arc::new(version_service),
            metadata_service: Arc::new(metadata_service),
            upload_service: Arc::new(upload_service),
            content_resolver: Arc::new(content_resolver),
        })
    }
}
