//! Geodash REST API
//!
//! HTTP API layer for the dashboards, built with Axum.
//!
//! # Endpoints
//!
//! ## Catalog
//! - `GET /api/v1/indicators` - Indicator catalog
//! - `GET /api/v1/countries` - Country lookup from the current snapshot
//! - `GET /api/v1/places` - Pollution place names
//!
//! ## Charts
//! - `POST /api/v1/charts/choropleth` - Indicator map over a year range
//! - `POST /api/v1/charts/pollution` - Per-place time series
//!
//! ## Refresh
//! - `POST /api/v1/refresh` - Trigger a refresh
//! - `GET /api/v1/refresh/status` - Refresh bookkeeping
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe (requires a populated cache)
//! - `GET /health` - Full health status

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Catalog routes
        .route("/indicators", get(routes::catalog::list_indicators))
        .route("/countries", get(routes::catalog::list_countries))
        .route("/places", get(routes::catalog::list_places))
        // Chart routes
        .route("/charts/choropleth", post(routes::charts::choropleth))
        .route("/charts/pollution", post(routes::charts::pollution))
        // Refresh routes
        .route("/refresh", post(routes::refresh::trigger_refresh))
        .route("/refresh/status", get(routes::refresh::refresh_status));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()) // Configure properly in production
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Geodash API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Geodash API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{
        CountrySourceRow, CountryTable, IndicatorCatalog, IndicatorTable, Observation,
        PollutionTable,
    };
    use crate::refresh::{RefreshConfig, Refresher};
    use crate::sources::{SnapshotSource, SourceError};
    use crate::store::{IndicatorStore, Snapshot};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    struct StubSource;

    #[async_trait]
    impl SnapshotSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        async fn fetch_snapshot(&self) -> Result<Snapshot, SourceError> {
            let countries = test_countries();
            let indicators = test_indicators(&countries);
            Ok(Snapshot::new(countries, indicators))
        }
    }

    fn test_countries() -> CountryTable {
        CountryTable::from_source_rows(vec![
            CountrySourceRow {
                name: "France".to_string(),
                iso3c: "FRA".to_string(),
                capital_city: "Paris".to_string(),
            },
            CountrySourceRow {
                name: "Germany".to_string(),
                iso3c: "DEU".to_string(),
                capital_city: "Berlin".to_string(),
            },
        ])
    }

    fn test_indicators(countries: &CountryTable) -> IndicatorTable {
        IndicatorTable::from_observations(
            vec![
                Observation {
                    iso3c: "FRA".to_string(),
                    year: 2010,
                    indicator: "EN.ATM.CO2E.KT".to_string(),
                    value: 100.0,
                },
                Observation {
                    iso3c: "DEU".to_string(),
                    year: 2010,
                    indicator: "EN.ATM.CO2E.KT".to_string(),
                    value: 50.0,
                },
            ],
            countries,
        )
    }

    fn test_pollution() -> PollutionTable {
        let csv = "\
Geo Place Name,Start_Date,Data Value
Harlem,12/01/2015,9.4
Upper East Side,12/01/2015,8.6
";
        PollutionTable::from_reader(csv.as_bytes()).unwrap()
    }

    async fn create_test_app(populated: bool) -> Router {
        let store = Arc::new(IndicatorStore::new());
        if populated {
            let countries = test_countries();
            let indicators = test_indicators(&countries);
            store.replace(Snapshot::new(countries, indicators)).await;
        }

        let refresher = Arc::new(Refresher::new(
            Arc::new(StubSource),
            Arc::clone(&store),
            RefreshConfig::default(),
        ));

        let state = AppState::new(
            store,
            Arc::new(IndicatorCatalog::world_bank_defaults()),
            Arc::new(test_pollution()),
            refresher,
            ApiConfig::default(),
        );

        build_router(state)
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app(true).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_requires_populated_cache() {
        let app = create_test_app(false).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let app = create_test_app(true).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_indicators() {
        let app = create_test_app(true).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/indicators")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["indicators"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_countries_empty_cache_is_503() {
        let app = create_test_app(false).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/countries")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_list_places() {
        let app = create_test_app(true).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/places")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["places"],
            serde_json::json!(["Harlem", "Upper East Side"])
        );
    }

    #[tokio::test]
    async fn test_choropleth_chart() {
        let app = create_test_app(true).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/charts/choropleth")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"indicator": "EN.ATM.CO2E.KT", "start_year": 2010, "end_year": 2010}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["label"], "CO2 emissions (kt)");
        assert_eq!(body["projection"], "natural earth");
        assert_eq!(body["regions"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_choropleth_unknown_indicator_is_400() {
        let app = create_test_app(true).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/charts/choropleth")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"indicator": "XX.NOPE", "start_year": 2010, "end_year": 2010}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_choropleth_empty_cache_is_503() {
        let app = create_test_app(false).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/charts/choropleth")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"indicator": "EN.ATM.CO2E.KT", "start_year": 2010, "end_year": 2010}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_pollution_chart_empty_selection() {
        let app = create_test_app(true).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/charts/pollution")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"places": []}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["series"].as_array().unwrap().is_empty());
        assert_eq!(body["log_y"], true);
    }

    #[tokio::test]
    async fn test_manual_refresh_populates_cache() {
        let app = create_test_app(false).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["populated"], true);
    }

    #[tokio::test]
    async fn test_refresh_status() {
        let app = create_test_app(false).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/refresh/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["populated"], false);
        assert_eq!(body["error_count"], 0);
    }
}
