//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::dataset::{IndicatorCatalog, PollutionTable};
use crate::refresh::Refresher;
use crate::store::IndicatorStore;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Cached indicator snapshot (periodic refresh target)
    pub store: Arc<IndicatorStore>,
    /// The fixed indicator catalog
    pub catalog: Arc<IndicatorCatalog>,
    /// Pollution readings loaded at startup
    pub pollution: Arc<PollutionTable>,
    /// Background refresher, also serves manual triggers
    pub refresher: Arc<Refresher>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<IndicatorStore>,
        catalog: Arc<IndicatorCatalog>,
        pollution: Arc<PollutionTable>,
        refresher: Arc<Refresher>,
        config: ApiConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            pollution,
            refresher,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8050,
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
