//! In-Memory Datasets
//!
//! The two tables every dashboard is built on, plus the indicator
//! catalog:
//! - Country lookup (name to ISO-3166 alpha-3 code)
//! - Indicator table (one row per country and year)
//! - Pollution readings (place, date, value) from a local CSV

mod country;
mod indicator;
mod pollution;

pub use country::{CountryEntry, CountrySourceRow, CountryTable};
pub use indicator::{
    CountryValue, Indicator, IndicatorCatalog, IndicatorRow, IndicatorTable, Observation,
};
pub use pollution::{PollutionLoadReport, PollutionReading, PollutionTable};

/// Errors that can occur while loading or shaping datasets
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),
}
