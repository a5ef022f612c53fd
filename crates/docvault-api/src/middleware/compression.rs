//! Response compression layer.

use tower_http::compression::predicate::{And, DefaultPredicate, NotForContentType, Predicate};
use tower_http::compression::CompressionLayer;

/// Compression layer type used by the router.
pub type DocVaultCompression = CompressionLayer<And<DefaultPredicate, NotForContentType>>;

/// Builds a compression layer (gzip). PDF bodies are already compressed
/// and keep their `Content-Length`.
pub fn build_compression_layer() -> DocVaultCompression {
    CompressionLayer::new().compress_when(
        DefaultPredicate::new().and(NotForContentType::const_new("application/pdf")),
    )
}
