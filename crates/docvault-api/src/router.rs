//! Route definitions for the DocVault HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, put},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Room left for multipart boundaries and text parts on top of the file
/// size limit, so oversized files are reported by the upload service.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let max_body = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(folder_routes())
        .merge(document_routes())
        .merge(version_routes())
        .merge(metadata_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TimeoutLayer::new(timeout))
        .layer(build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Liveness and backend health
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Folder CRUD, tree, ancestry, and moves
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route("/folders/tree", get(handlers::folder::get_tree))
        .route("/folders/{id}", get(handlers::folder::get_folder))
        .route("/folders/{id}/children", get(handlers::folder::list_children))
        .route("/folders/{id}/path", get(handlers::folder::get_path))
        .route("/folders/{id}/move", put(handlers::folder::move_folder))
}

/// Document registration, lookup, and content
fn document_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/documents",
            get(handlers::document::list_documents).post(handlers::document::create_document),
        )
        .route("/documents/{id}", get(handlers::document::get_document))
        .route("/documents/{id}/content", get(handlers::content::get_content))
}

/// Version history
fn version_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/documents/{id}/versions",
            get(handlers::version::list_versions).post(handlers::version::add_version),
        )
        .route(
            "/documents/{id}/versions/current",
            get(handlers::version::current_version),
        )
        .route(
            "/documents/{id}/versions/{n}",
            get(handlers::version::get_version),
        )
}

/// Per-document key/value metadata
fn metadata_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/documents/{id}/metadata",
            get(handlers::metadata::get_metadata),
        )
        .route(
            "/documents/{id}/metadata/{key}",
            get(handlers::metadata::get_entry).put(handlers::metadata::set_entry),
        )
}
