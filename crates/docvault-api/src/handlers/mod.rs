//! Route handlers organized by domain.

pub mod content;
pub mod document;
pub mod folder;
pub mod health;
pub mod metadata;
pub mod version;
