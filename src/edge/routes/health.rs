//! Health Routes
//!
//! Mounted under `health_path` when configured, e.g. `/_edge/health`:
//!
//! - GET {health_path}/live - Liveness probe (process is alive)
//! - GET {health_path}/ready - Readiness probe (entry document is present)
//! - GET {health_path} - Status summary

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::edge::state::EdgeState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub upstream: String,
    pub static_dir: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET {health_path}/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET {health_path}/ready
///
/// The SPA cannot be served without its entry document, so readiness
/// tracks whether that file exists.
pub async fn readiness(State(state): State<Arc<EdgeState>>) -> StatusCode {
    if index_present(&state).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET {health_path}
pub async fn full_health(State(state): State<Arc<EdgeState>>) -> Json<HealthResponse> {
    let status = if index_present(&state).await {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        upstream: state.upstream.to_string(),
        static_dir: state.config.static_dir.display().to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn index_present(state: &EdgeState) -> bool {
    tokio::fs::metadata(state.config.index_path())
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
