//! Content store trait for pluggable document byte backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading document contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for content store backends.
///
/// Keys are the opaque stored filenames recorded on documents and
/// versions. Every failure is reported as
/// [`ErrorKind::StorageUnavailable`](crate::ErrorKind::StorageUnavailable)
/// so that callers never have to distinguish transport faults.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Open an object and return its byte stream.
    async fn read(&self, key: &str) -> AppResult<ByteStream>;

    /// Write bytes under the given key, replacing any existing object.
    async fn write(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Delete the object stored under the given key.
    async fn delete(&self, key: &str) -> AppResult<()>;
}
