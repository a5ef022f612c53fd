//! Health check handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{ApiResponse, ComponentHealth, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// Answers 503 with the same body when a backend is down.
pub async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let registry_healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!(backend = state.store.backend(), error = %e, "Registry health check failed");
            false
        }
    };
    let storage = state.storage_manager.health_check_all().await;
    let healthy = registry_healthy && storage.values().all(|ok| *ok);

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        registry: ComponentHealth {
            backend: state.store.backend().to_string(),
            healthy: registry_healthy,
        },
        storage,
    };

    (status, Json(ApiResponse::ok(body)))
}
