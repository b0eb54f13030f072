//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe.
/// Ready once the indicator cache has been populated by a refresh.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.store.is_populated().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let cache_ok = state.store.is_populated().await;
    let pollution_ok = !state.pollution.is_empty();

    let cache_status = if cache_ok { "ok" } else { "empty" };
    let pollution_status = if pollution_ok { "ok" } else { "empty" };

    let overall_status = if cache_ok && pollution_ok {
        "healthy"
    } else if cache_ok || pollution_ok {
        "degraded"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: overall_status.to_string(),
        cache: cache_status.to_string(),
        pollution: pollution_status.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
