//! Upstream Data Sources
//!
//! The World Bank API client lives here, behind the [`SnapshotSource`]
//! trait so the refresher can be driven by a stub in tests.

mod worldbank;

pub use worldbank::{WorldBankClient, WorldBankConfig};

use crate::store::Snapshot;
use async_trait::async_trait;

/// A source that can produce a complete indicator snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Unique name for this source, used in logs
    fn name(&self) -> &str;

    /// Download and build a full snapshot
    async fn fetch_snapshot(&self) -> Result<Snapshot, SourceError>;
}

/// Errors that can occur while talking to an upstream source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Upstream unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),
}
