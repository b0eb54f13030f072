//! Refresh Routes
//!
//! Manual trigger and observability for the background refresh.
//!
//! - POST /api/v1/refresh - Run a refresh now
//! - GET /api/v1/refresh/status - Refresh bookkeeping

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::RefreshStatusResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// POST /api/v1/refresh
///
/// Run a refresh immediately. Returns the updated bookkeeping on
/// success; a failed download surfaces as an upstream error while the
/// cache keeps its previous contents.
pub async fn trigger_refresh(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RefreshStatusResponse>> {
    state.refresher.refresh_once().await?;

    Ok(Json(RefreshStatusResponse {
        populated: state.store.is_populated().await,
        state: state.refresher.state().await,
    }))
}

/// GET /api/v1/refresh/status
pub async fn refresh_status(State(state): State<Arc<AppState>>) -> Json<RefreshStatusResponse> {
    Json(RefreshStatusResponse {
        populated: state.store.is_populated().await,
        state: state.refresher.state().await,
    })
}
