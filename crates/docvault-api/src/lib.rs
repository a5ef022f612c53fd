//! # docvault-api
//!
//! HTTP API layer for DocVault built on Axum.
//!
//! Exposes the registry over REST: folders, documents, versions, metadata,
//! and content streaming, plus middleware (CORS, logging, compression),
//! extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use error::ApiError;
pub use state::AppState;
