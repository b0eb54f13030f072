//! Indicator Cache
//!
//! Holds the latest snapshot of downloaded World Bank data. The
//! refresher builds a complete snapshot before swapping it in, so
//! readers only ever see a fully joined table. Readers clone the `Arc`
//! and keep working against their copy while a refresh replaces the
//! cache underneath them.

use crate::dataset::{CountryTable, IndicatorTable};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A fully built download: country lookup plus joined indicator table
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub countries: CountryTable,
    pub indicators: IndicatorTable,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(countries: CountryTable, indicators: IndicatorTable) -> Self {
        Self {
            countries,
            indicators,
            fetched_at: Utc::now(),
        }
    }
}

/// Shared snapshot cache, empty until the first successful refresh
#[derive(Debug, Default)]
pub struct IndicatorStore {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl IndicatorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest snapshot, if any refresh has succeeded
    pub async fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current.read().await.clone()
    }

    /// Replace the cache with a new snapshot
    pub async fn replace(&self, snapshot: Snapshot) {
        *self.current.write().await = Some(Arc::new(snapshot));
    }

    /// Whether the cache has been populated
    pub async fn is_populated(&self) -> bool {
        self.current.read().await.is_some()
    }
}
