//! Resolved content references.

use docvault_core::types::DocumentId;
use serde::{Deserialize, Serialize};

/// Everything needed to locate and present a version's bytes.
///
/// Callers address content through this reference, never through
/// guessed storage paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef {
    /// The document the content belongs to.
    pub document_id: DocumentId,
    /// The resolved version number.
    pub version_number: i32,
    /// Key in the content store.
    pub stored_filename: String,
    /// Size in bytes as recorded by the registry.
    pub file_size: i64,
    /// Filename to present to clients.
    pub original_filename: String,
    /// MIME type to present to clients. Always `application/pdf` for
    /// registry documents.
    pub mime_type: String,
}
