//! Chart Recompute
//!
//! Pure functions turning (cached tables, filter state) into
//! chart-ready figures. These are the reactive callbacks of the
//! dashboards: rendering is the consumer's job, so output carries the
//! data plus display hints (axis labels, scale, projection).

mod choropleth;
mod line;

pub use choropleth::{build_choropleth, ChoroplethFigure, ChoroplethRequest};
pub use line::{build_pollution_lines, LineFigure, LinePoint, LineSeries};

/// Errors from chart recomputation
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("Invalid year range: start {start} is after end {end}")]
    InvalidYearRange { start: i32, end: i32 },
}
