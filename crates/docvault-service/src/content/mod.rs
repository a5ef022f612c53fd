//! File content resolution.

pub mod resolver;

pub use resolver::ContentResolver;
