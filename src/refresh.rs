//! Periodic Refresh
//!
//! Re-downloads the indicator snapshot on an interval (the timer tick
//! of the original dashboards). A failed refresh never touches the
//! cache: the previous snapshot keeps serving while the next attempt
//! backs off with the error count.

use crate::sources::{SnapshotSource, SourceError};
use crate::store::IndicatorStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Configuration for the refresh task
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub enabled: bool,
    /// Seconds between refreshes
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
        }
    }
}

/// Outcome of the last refresh attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RefreshStatus {
    Success { rows: usize, countries: usize },
    Failed { error: String },
}

/// Observable refresh bookkeeping
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshState {
    pub last_refresh: Option<DateTime<Utc>>,
    pub last_status: Option<RefreshStatus>,
    pub next_refresh: Option<DateTime<Utc>>,
    pub error_count: u32,
}

/// Drives periodic snapshot refreshes against a source
pub struct Refresher {
    source: Arc<dyn SnapshotSource>,
    store: Arc<IndicatorStore>,
    config: RefreshConfig,
    state: RwLock<RefreshState>,
    running: RwLock<bool>,
}

impl Refresher {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        store: Arc<IndicatorStore>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            source,
            store,
            config,
            state: RwLock::new(RefreshState::default()),
            running: RwLock::new(false),
        }
    }

    /// Current bookkeeping
    pub async fn state(&self) -> RefreshState {
        self.state.read().await.clone()
    }

    /// Run one refresh now, updating bookkeeping. Manual triggers and
    /// the interval loop both land here.
    pub async fn refresh_once(&self) -> Result<(), SourceError> {
        let result = self.source.fetch_snapshot().await;
        let interval = Duration::seconds(self.config.interval_secs as i64);

        let mut state = self.state.write().await;
        state.last_refresh = Some(Utc::now());

        match result {
            Ok(snapshot) => {
                let rows = snapshot.indicators.len();
                let countries = snapshot.countries.len();
                self.store.replace(snapshot).await;

                state.last_status = Some(RefreshStatus::Success { rows, countries });
                state.error_count = 0;
                state.next_refresh = Some(Utc::now() + interval);

                tracing::info!(
                    source = self.source.name(),
                    rows,
                    countries,
                    "Snapshot refreshed"
                );
                Ok(())
            }
            Err(e) => {
                state.last_status = Some(RefreshStatus::Failed {
                    error: e.to_string(),
                });
                state.error_count += 1;

                // Linear backoff with the error count, capped at 5 intervals
                let backoff = interval * state.error_count.min(5) as i32;
                state.next_refresh = Some(Utc::now() + interval + backoff);

                tracing::error!(
                    source = self.source.name(),
                    error = %e,
                    error_count = state.error_count,
                    "Snapshot refresh failed"
                );
                Err(e)
            }
        }
    }

    /// Start the background refresh loop. Performs one eager refresh,
    /// then checks the due time every second.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let refresher = self.clone();

        tokio::spawn(async move {
            *refresher.running.write().await = true;

            let _ = refresher.refresh_once().await;

            let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                if !*refresher.running.read().await {
                    break;
                }

                let due = {
                    let state = refresher.state.read().await;
                    state.next_refresh.map(|next| Utc::now() >= next).unwrap_or(false)
                };

                if due {
                    let _ = refresher.refresh_once().await;
                }
            }
        })
    }

    /// Stop the background loop
    pub async fn stop(&self) {
        *self.running.write().await = false;
    }
}
