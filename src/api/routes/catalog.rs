//! Catalog Routes
//!
//! The option lists behind the dashboard form controls.
//!
//! - GET /api/v1/indicators - Indicator catalog
//! - GET /api/v1/countries - Country lookup from the current snapshot
//! - GET /api/v1/places - Pollution place names

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{CountriesResponse, IndicatorsResponse, PlacesResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /api/v1/indicators
pub async fn list_indicators(State(state): State<Arc<AppState>>) -> Json<IndicatorsResponse> {
    Json(IndicatorsResponse {
        indicators: state.catalog.indicators().to_vec(),
    })
}

/// GET /api/v1/countries
///
/// Country lookup from the cached snapshot; 503 until the first
/// successful refresh.
pub async fn list_countries(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CountriesResponse>> {
    let snapshot = state
        .store
        .snapshot()
        .await
        .ok_or_else(|| ApiError::NotReady("indicator data not loaded yet".to_string()))?;

    Ok(Json(CountriesResponse {
        countries: snapshot.countries.entries().to_vec(),
        fetched_at: snapshot.fetched_at,
    }))
}

/// GET /api/v1/places
///
/// Sorted unique place names from the pollution table.
pub async fn list_places(State(state): State<Arc<AppState>>) -> Json<PlacesResponse> {
    Json(PlacesResponse {
        places: state.pollution.places(),
    })
}
