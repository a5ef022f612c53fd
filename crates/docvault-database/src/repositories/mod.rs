//! PostgreSQL repository implementations for all registry entities.

pub mod document;
pub mod folder;
pub mod metadata;
pub mod version;

pub use document::DocumentRepository;
pub use folder::FolderRepository;
pub use metadata::MetadataRepository;
pub use version::VersionRepository;
