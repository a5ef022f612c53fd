//! Content store provider implementations.

pub mod local;

pub use local::LocalStorageProvider;
