//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use crate::dataset::{CountryEntry, Indicator};
use crate::refresh::RefreshState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// CATALOG DTOs
// ============================================

/// Indicator catalog listing
#[derive(Debug, Serialize)]
pub struct IndicatorsResponse {
    pub indicators: Vec<Indicator>,
}

/// Country lookup listing from the current snapshot
#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub countries: Vec<CountryEntry>,
    /// When the snapshot was downloaded
    pub fetched_at: DateTime<Utc>,
}

/// Pollution place-name listing
#[derive(Debug, Serialize)]
pub struct PlacesResponse {
    pub places: Vec<String>,
}

// ============================================
// CHART DTOs
// ============================================

/// Pollution line chart request: the place multi-select
#[derive(Debug, Deserialize)]
pub struct PollutionChartRequest {
    #[serde(default)]
    pub places: Vec<String>,
}

// ============================================
// REFRESH DTOs
// ============================================

/// Refresh status response
#[derive(Debug, Serialize)]
pub struct RefreshStatusResponse {
    /// Whether any refresh has populated the cache
    pub populated: bool,
    #[serde(flatten)]
    pub state: RefreshState,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded, unhealthy
    pub status: String,
    /// Indicator cache status
    pub cache: String,
    /// Pollution table status
    pub pollution: String,
    /// Server uptime
    pub uptime_seconds: u64,
    /// Crate version
    pub version: String,
}
