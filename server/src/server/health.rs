//! Health check endpoints.

use super::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Liveness check. Returns 200 while the process is serving requests.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"ok","version":"0.1.0"}
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Readiness check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    /// Overall readiness
    pub ready: bool,
    /// Whether the catalog has been loaded
    pub catalog_loaded: bool,
    /// Whether the store still accepts actions
    pub accepting_actions: bool,
}

/// Readiness check.
///
/// 200 once the catalog is loaded and the store is not shutting down,
/// 503 otherwise.
pub async fn readiness_check(State(app): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let catalog_loaded = app.store.state(|s| s.catalog_loaded).await;
    let accepting_actions = !app.store.is_shutting_down();
    let ready = catalog_loaded && accepting_actions;

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready,
            catalog_loaded,
            accepting_actions,
        }),
    )
}
