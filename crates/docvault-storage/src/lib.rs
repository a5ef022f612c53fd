//! # docvault-storage
//!
//! Content store implementations for DocVault. Document bytes live under
//! opaque stored filenames generated by [`naming`]; the registry only ever
//! records those keys.

pub mod manager;
pub mod mime;
pub mod naming;
pub mod providers;

pub use manager::StorageManager;
pub use providers::LocalStorageProvider;
