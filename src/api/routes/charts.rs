//! Chart Routes
//!
//! The reactive recompute endpoints: each takes filter state and
//! returns a chart-ready figure computed from the cached tables.
//!
//! - POST /api/v1/charts/choropleth - Indicator map over a year range
//! - POST /api/v1/charts/pollution - Per-place time series

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::PollutionChartRequest;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::chart::{build_choropleth, build_pollution_lines, ChoroplethFigure, ChoroplethRequest, LineFigure};

/// POST /api/v1/charts/choropleth
///
/// Recompute the choropleth from the cached snapshot and the chosen
/// indicator and year range. 503 until the first successful refresh.
pub async fn choropleth(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChoroplethRequest>,
) -> ApiResult<Json<ChoroplethFigure>> {
    let snapshot = state
        .store
        .snapshot()
        .await
        .ok_or_else(|| ApiError::NotReady("indicator data not loaded yet".to_string()))?;

    let figure = build_choropleth(&snapshot.indicators, &state.catalog, &request)?;

    tracing::debug!(
        indicator = %request.indicator,
        start_year = request.start_year,
        end_year = request.end_year,
        regions = figure.regions.len(),
        "Choropleth recomputed"
    );

    Ok(Json(figure))
}

/// POST /api/v1/charts/pollution
///
/// Recompute the line figure from the pollution table and the place
/// selection. An empty selection returns an empty figure.
pub async fn pollution(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PollutionChartRequest>,
) -> Json<LineFigure> {
    let figure = build_pollution_lines(&state.pollution, &request.places);

    tracing::debug!(
        places = request.places.len(),
        series = figure.series.len(),
        "Pollution lines recomputed"
    );

    Json(figure)
}
