//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use docvault_api::AppState;
use docvault_api::extractors::ACTOR_HEADER;
use docvault_core::config::{AppConfig, DatabaseProvider};
use docvault_database::{MemoryRegistryStore, RegistryStore};
use docvault_storage::{LocalStorageProvider, StorageManager};

const BOUNDARY: &str = "docvault-test-boundary";

/// Test application over the in-memory registry and a temp-dir content store.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Content store root
    pub storage_root: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    /// Create a new test application with default settings
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// Create a test application with a custom config; the registry and
    /// content store are always replaced with test doubles.
    pub async fn with_config(config: AppConfig) -> Self {
        Self::build(config, Arc::new(MemoryRegistryStore::new())).await
    }

    /// Create a test application over a caller-supplied registry store
    pub async fn with_store(store: Arc<dyn RegistryStore>) -> Self {
        Self::build(AppConfig::default(), store).await
    }

    async fn build(mut config: AppConfig, store: Arc<dyn RegistryStore>) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage_root = dir.path().join("uploads");

        config.database.provider = DatabaseProvider::Memory;
        config.storage.data_root = dir.path().display().to_string();
        config.storage.local.root_path = storage_root.display().to_string();

        let provider = LocalStorageProvider::new(&storage_root)
            .await
            .expect("Failed to init content store");
        let storage_manager = Arc::new(StorageManager::with_default("local", Arc::new(provider)));

        let state =
            AppState::new(config.clone(), store, storage_manager).expect("Failed to build state");

        Self {
            router: docvault_api::build_app(state),
            config,
            storage_root,
            _dir: dir,
        }
    }

    /// Make an HTTP request with an optional JSON body
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        actor: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(actor) = actor {
            req = req.header(ACTOR_HEADER, actor);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Upload a multipart form with a file part and text parts
    pub async fn upload(
        &self,
        path: &str,
        file: Option<(&str, &str, Vec<u8>)>,
        fields: &[(&str, &str)],
        actor: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(actor) = actor {
            req = req.header(ACTOR_HEADER, actor);
        }

        let req = req
            .body(Body::from(multipart_body(file, fields)))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Upload a new PDF document and return its id
    pub async fn upload_pdf(&self, filename: &str, content: &[u8], fields: &[(&str, &str)]) -> i64 {
        let response = self
            .upload(
                "/api/documents",
                Some((filename, "application/pdf", content.to_vec())),
                fields,
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Upload failed: {:?}",
            response.body
        );
        response.body["data"]["document"]["id"]
            .as_i64()
            .expect("No document id in upload response")
    }

    /// Create a folder and return its id
    pub async fn create_folder(&self, name: &str, parent_id: Option<i64>) -> i64 {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(serde_json::json!({ "name": name, "parent_id": parent_id })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create folder failed: {:?}",
            response.body
        );
        response.body["data"]["id"]
            .as_i64()
            .expect("No folder id in response")
    }

    /// Number of blobs currently in the content store
    pub fn stored_blob_count(&self) -> usize {
        count_files(&self.storage_root)
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let raw = axum::body::to_bytes(response.into_body(), 64 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&raw).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            raw,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body bytes
    pub raw: Bytes,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
}

impl TestResponse {
    /// The machine-readable error code of an error response
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or("")
    }

    /// A response header as text
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }
}

/// Minimal PDF-looking content, unique per tag
pub fn pdf_bytes(tag: &str) -> Vec<u8> {
    format!("%PDF-1.7\n% {tag}\n1 0 obj\n<<>>\nendobj\n%%EOF\n").into_bytes()
}

fn multipart_body(file: Option<(&str, &str, Vec<u8>)>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content_type, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}
