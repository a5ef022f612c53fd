//! Document, version, metadata, and upload services.

pub mod metadata;
pub mod service;
pub mod upload;
pub mod version;

pub use metadata::MetadataService;
pub use service::{CreatedDocument, DocumentService, RegisterDocumentRequest};
pub use upload::{UploadDocumentParams, UploadService, UploadedFile};
pub use version::{AddVersionRequest, VersionService};
