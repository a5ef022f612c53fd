//! Document domain entities.

pub mod content;
pub mod metadata;
pub mod model;
pub mod version;

pub use content::ContentRef;
pub use metadata::{MetadataEntry, MetadataMap};
pub use model::{CreateDocument, Document};
pub use version::{CreateVersion, Version};
