//! # docvault-database
//!
//! Registry persistence for DocVault: the [`RegistryStore`] trait family,
//! the PostgreSQL implementation backed by per-entity repositories, and a
//! volatile in-memory implementation used for development and tests.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::memory::MemoryRegistryStore;
pub use store::postgres::PostgresStore;
pub use store::{DocumentStore, FolderStore, MetadataStore, RegistryStore, VersionStore};
