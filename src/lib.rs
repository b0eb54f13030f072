//! # Geodash
//!
//! Dashboard data service: loads tabular datasets (a World Bank
//! indicator download and a local air-quality CSV), recomputes
//! chart-ready figures from user filter state, and keeps the download
//! fresh with a periodic background refresh.
//!
//! ## Modules
//!
//! - [`dataset`]: In-memory tables and the indicator catalog
//! - [`sources`]: World Bank API client behind a source trait
//! - [`store`]: Shared snapshot cache
//! - [`refresh`]: Periodic refresh task
//! - [`chart`]: Figure recompute (choropleth, time-series lines)
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use geodash::dataset::IndicatorCatalog;
//! use geodash::refresh::{RefreshConfig, Refresher};
//! use geodash::sources::{WorldBankClient, WorldBankConfig};
//! use geodash::store::IndicatorStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = IndicatorCatalog::world_bank_defaults();
//!     let client = WorldBankClient::new(WorldBankConfig::default(), catalog)?;
//!
//!     let store = Arc::new(IndicatorStore::new());
//!     let refresher = Arc::new(Refresher::new(
//!         Arc::new(client),
//!         Arc::clone(&store),
//!         RefreshConfig::default(),
//!     ));
//!
//!     refresher.refresh_once().await?;
//!     println!(
//!         "{} indicator rows cached",
//!         store.snapshot().await.unwrap().indicators.len()
//!     );
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod refresh;
pub mod sources;
pub mod store;

// Re-export top-level types for convenience
pub use dataset::{
    CountryEntry, CountryTable, CountryValue, DatasetError, Indicator, IndicatorCatalog,
    IndicatorTable, PollutionTable,
};

pub use chart::{
    build_choropleth, build_pollution_lines, ChartError, ChoroplethFigure, ChoroplethRequest,
    LineFigure,
};

pub use sources::{SnapshotSource, SourceError, WorldBankClient, WorldBankConfig};

pub use store::{IndicatorStore, Snapshot};

pub use refresh::{RefreshConfig, Refresher, RefreshState, RefreshStatus};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
