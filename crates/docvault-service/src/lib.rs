//! # docvault-service
//!
//! Business logic for DocVault: the document registry (folders, documents,
//! versions, metadata), upload orchestration, and content resolution.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. Every service talks to the
//! registry through `Arc<dyn RegistryStore>`.

pub mod content;
pub mod context;
pub mod document;
pub mod folder;

pub use content::ContentResolver;
pub use context::RequestContext;
pub use document::{DocumentService, MetadataService, UploadService, VersionService};
pub use folder::FolderService;
