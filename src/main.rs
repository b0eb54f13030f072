//! Geodash Server
//!
//! Loads the pollution CSV, wires the World Bank client, store, and
//! refresher together, and serves the dashboard API.
//!
//! # Configuration
//!
//! Reads `config.toml` from the usual locations; `GEODASH_*`
//! environment variables override individual settings (see
//! `config::generate_default_config()` for the full list).

use anyhow::Context;
use geodash::api::{serve, ApiConfig, AppState};
use geodash::config::Config;
use geodash::dataset::{IndicatorCatalog, PollutionTable};
use geodash::refresh::{RefreshConfig, Refresher};
use geodash::sources::{WorldBankClient, WorldBankConfig};
use geodash::store::IndicatorStore;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    init_tracing(&config.logging.level, &config.logging.format);

    tracing::info!("Starting Geodash server v{}", env!("CARGO_PKG_VERSION"));

    // Pollution readings load once at startup. A missing or unreadable
    // file degrades the service rather than aborting it: the choropleth
    // half keeps working against an empty pollution table.
    let pollution = load_pollution(&config.data.pollution_csv);

    let catalog = Arc::new(IndicatorCatalog::world_bank_defaults());

    let client = WorldBankClient::new(
        WorldBankConfig {
            base_url: config.worldbank.base_url.clone(),
            year_start: config.worldbank.year_start,
            year_end: config.worldbank.year_end,
            per_page: config.worldbank.per_page,
            request_timeout_ms: config.worldbank.request_timeout_ms,
            max_retries: config.worldbank.max_retries,
        },
        IndicatorCatalog::world_bank_defaults(),
    )
    .context("Failed to build World Bank client")?;

    let store = Arc::new(IndicatorStore::new());
    let refresher = Arc::new(Refresher::new(
        Arc::new(client),
        Arc::clone(&store),
        RefreshConfig {
            enabled: config.refresh.enabled,
            interval_secs: config.refresh.interval_secs,
        },
    ));

    let refresh_handle = if config.refresh.enabled {
        tracing::info!(
            interval_secs = config.refresh.interval_secs,
            "Starting background refresh"
        );
        Some(Arc::clone(&refresher).start())
    } else {
        tracing::info!("Background refresh disabled; run POST /api/v1/refresh manually");
        None
    };

    let api_config = ApiConfig::new(config.api.host.clone(), config.api.port);
    let state = AppState::new(
        store,
        catalog,
        Arc::new(pollution),
        Arc::clone(&refresher),
        api_config.clone(),
    );

    serve(state, &api_config).await?;

    refresher.stop().await;
    if let Some(handle) = refresh_handle {
        handle.abort();
    }

    tracing::info!("Geodash server stopped");
    Ok(())
}

/// Initialize the tracing subscriber from logging config
fn init_tracing(level: &str, format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("geodash={},tower_http=debug", level))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Load the pollution CSV, degrading to an empty table on failure
fn load_pollution(path: &str) -> PollutionTable {
    match PollutionTable::from_path(Path::new(path)) {
        Ok(table) => {
            let report = table.report();
            tracing::info!(
                path,
                rows = report.rows_loaded,
                skipped = report.rows_skipped,
                "Pollution readings loaded"
            );
            for error in report.errors.iter().take(5) {
                tracing::warn!(path, "{}", error);
            }
            table
        }
        Err(e) => {
            tracing::warn!(path, error = %e, "Pollution CSV unavailable, serving empty table");
            PollutionTable::default()
        }
    }
}
