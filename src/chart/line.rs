//! Pollution Line Figure
//!
//! One time series per selected place. An empty selection yields an
//! empty figure, matching the original dashboard's blank chart.

use crate::dataset::PollutionTable;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single (date, value) point
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One series per place, points sorted by date
#[derive(Debug, Clone, Serialize)]
pub struct LineSeries {
    pub place: String,
    pub points: Vec<LinePoint>,
}

/// Chart-ready line data with display hints
#[derive(Debug, Clone, Serialize)]
pub struct LineFigure {
    /// Series sorted by place name
    pub series: Vec<LineSeries>,
    pub log_y: bool,
    pub x_label: String,
    pub y_label: String,
}

impl LineFigure {
    fn empty() -> Self {
        Self {
            series: Vec::new(),
            log_y: true,
            x_label: "Reading Date".to_string(),
            y_label: "Pollution Value".to_string(),
        }
    }
}

/// Recompute the line figure for a place selection
pub fn build_pollution_lines(table: &PollutionTable, places: &[String]) -> LineFigure {
    if places.is_empty() {
        return LineFigure::empty();
    }

    let mut grouped: BTreeMap<&str, Vec<LinePoint>> = BTreeMap::new();
    for reading in table.filter_places(places) {
        grouped
            .entry(reading.place.as_str())
            .or_default()
            .push(LinePoint {
                date: reading.date,
                value: reading.value,
            });
    }

    let series = grouped
        .into_iter()
        .map(|(place, points)| LineSeries {
            place: place.to_string(),
            points,
        })
        .collect();

    LineFigure {
        series,
        ..LineFigure::empty()
    }
}
