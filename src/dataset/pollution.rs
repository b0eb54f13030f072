//! Pollution Readings
//!
//! Loads the air-quality CSV once at startup. The file carries many
//! columns; the dashboard uses three, located by header name:
//! `Geo Place Name`, `Start_Date`, `Data Value`. Rows that fail to
//! parse are skipped and counted rather than aborting the load.

use super::DatasetError;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

const PLACE_COLUMN: &str = "Geo Place Name";
const DATE_COLUMN: &str = "Start_Date";
const VALUE_COLUMN: &str = "Data Value";

/// A single measured reading
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PollutionReading {
    pub place: String,
    pub date: NaiveDate,
    pub value: f64,
}

/// Row accounting from a CSV load
#[derive(Debug, Clone, Default)]
pub struct PollutionLoadReport {
    pub rows_loaded: usize,
    pub rows_skipped: usize,
    pub errors: Vec<String>,
}

/// The readings table, sorted by (place, date)
#[derive(Debug, Clone, Default)]
pub struct PollutionTable {
    readings: Vec<PollutionReading>,
    report: PollutionLoadReport,
}

impl PollutionTable {
    /// Load readings from a CSV file
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load readings from any CSV reader (useful for testing)
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let place_col = find_column(&headers, PLACE_COLUMN)?;
        let date_col = find_column(&headers, DATE_COLUMN)?;
        let value_col = find_column(&headers, VALUE_COLUMN)?;

        let mut readings = Vec::new();
        let mut report = PollutionLoadReport::default();

        for (line_num, result) in csv_reader.records().enumerate() {
            let actual_line = line_num + 2;

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    report.errors.push(format!("Line {}: {}", actual_line, e));
                    report.rows_skipped += 1;
                    continue;
                }
            };

            let place = record.get(place_col).unwrap_or("").trim();
            let date_str = record.get(date_col).unwrap_or("").trim();
            let value_str = record.get(value_col).unwrap_or("").trim();

            if place.is_empty() {
                report
                    .errors
                    .push(format!("Line {}: empty place name", actual_line));
                report.rows_skipped += 1;
                continue;
            }

            let date = match parse_date(date_str) {
                Some(d) => d,
                None => {
                    report
                        .errors
                        .push(format!("Line {}: unparseable date: {}", actual_line, date_str));
                    report.rows_skipped += 1;
                    continue;
                }
            };

            let value = match value_str.parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    report.errors.push(format!(
                        "Line {}: unparseable value: {}",
                        actual_line, value_str
                    ));
                    report.rows_skipped += 1;
                    continue;
                }
            };

            readings.push(PollutionReading {
                place: place.to_string(),
                date,
                value,
            });
            report.rows_loaded += 1;
        }

        // Cap the error list so a malformed file does not balloon memory
        if report.errors.len() > 100 {
            let total = report.errors.len();
            report.errors.truncate(100);
            report
                .errors
                .push(format!("... and {} more errors", total - 100));
        }

        readings.sort_by(|a, b| a.place.cmp(&b.place).then(a.date.cmp(&b.date)));

        Ok(Self { readings, report })
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn readings(&self) -> &[PollutionReading] {
        &self.readings
    }

    pub fn report(&self) -> &PollutionLoadReport {
        &self.report
    }

    /// Sorted unique place names (the dropdown option list)
    pub fn places(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.readings.iter().map(|r| r.place.as_str()).collect();
        set.into_iter().map(String::from).collect()
    }

    /// Readings whose place is in the selection, in (place, date) order
    pub fn filter_places<'a>(&'a self, places: &'a [String]) -> Vec<&'a PollutionReading> {
        self.readings
            .iter()
            .filter(|r| places.iter().any(|p| p == &r.place))
            .collect()
    }
}

/// Locate a column by header name, ignoring case and surrounding space
fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
}

/// Parse a reading date, trying the dataset's format first
fn parse_date(s: &str) -> Option<NaiveDate> {
    let formats = ["%m/%d/%Y", "%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    None
}
