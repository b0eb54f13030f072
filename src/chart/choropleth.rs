//! Choropleth Figure
//!
//! One value per country for a chosen indicator and year range. A
//! multi-year range averages each country over the years present; a
//! single-year range passes values through unaggregated.

use super::ChartError;
use crate::dataset::{CountryValue, IndicatorCatalog, IndicatorTable};
use serde::{Deserialize, Serialize};

/// Filter state for a choropleth recompute
#[derive(Debug, Clone, Deserialize)]
pub struct ChoroplethRequest {
    pub indicator: String,
    pub start_year: i32,
    pub end_year: i32,
}

/// Chart-ready choropleth data
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethFigure {
    pub indicator: String,
    /// Display label for the indicator (codes are renamed for display)
    pub label: String,
    pub start_year: i32,
    pub end_year: i32,
    /// Map projection hint for the renderer
    pub projection: String,
    /// One entry per country, sorted by country name
    pub regions: Vec<CountryValue>,
}

/// Recompute the choropleth for the given filter state
pub fn build_choropleth(
    table: &IndicatorTable,
    catalog: &IndicatorCatalog,
    request: &ChoroplethRequest,
) -> Result<ChoroplethFigure, ChartError> {
    let label = catalog
        .label_for(&request.indicator)
        .ok_or_else(|| ChartError::UnknownIndicator(request.indicator.clone()))?
        .to_string();

    if request.start_year > request.end_year {
        return Err(ChartError::InvalidYearRange {
            start: request.start_year,
            end: request.end_year,
        });
    }

    let regions = if request.start_year == request.end_year {
        table.single_year(&request.indicator, request.start_year)
    } else {
        table.mean_by_country(&request.indicator, request.start_year, request.end_year)
    };

    Ok(ChoroplethFigure {
        indicator: request.indicator.clone(),
        label,
        start_year: request.start_year,
        end_year: request.end_year,
        projection: "natural earth".to_string(),
        regions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CountrySourceRow, CountryTable, Observation};

    fn table() -> IndicatorTable {
        let countries = CountryTable::from_source_rows(vec![
            CountrySourceRow {
                name: "France".to_string(),
                iso3c: "FRA".to_string(),
                capital_city: "Paris".to_string(),
            },
            CountrySourceRow {
                name: "Germany".to_string(),
                iso3c: "DEU".to_string(),
                capital_city: "Berlin".to_string(),
            },
        ]);

        let mut observations = Vec::new();
        for (iso, base) in [("FRA", 100.0), ("DEU", 50.0)] {
            for (i, year) in (2010..=2012).enumerate() {
                observations.push(Observation {
                    iso3c: iso.to_string(),
                    year,
                    indicator: "EN.ATM.CO2E.KT".to_string(),
                    value: base + i as f64 * 10.0,
                });
            }
        }

        IndicatorTable::from_observations(observations, &countries)
    }

    fn request(start: i32, end: i32) -> ChoroplethRequest {
        ChoroplethRequest {
            indicator: "EN.ATM.CO2E.KT".to_string(),
            start_year: start,
            end_year: end,
        }
    }

    #[test]
    fn test_range_averages_per_country() {
        let catalog = IndicatorCatalog::world_bank_defaults();
        let figure = build_choropleth(&table(), &catalog, &request(2010, 2012)).unwrap();

        assert_eq!(figure.label, "CO2 emissions (kt)");
        assert_eq!(figure.projection, "natural earth");
        assert_eq!(figure.regions.len(), 2);
        assert_eq!(figure.regions[0].country, "France");
        assert_eq!(figure.regions[0].value, 110.0);
        assert_eq!(figure.regions[1].value, 60.0);
    }

    #[test]
    fn test_single_year_no_aggregation() {
        let catalog = IndicatorCatalog::world_bank_defaults();
        let figure = build_choropleth(&table(), &catalog, &request(2011, 2011)).unwrap();

        assert_eq!(figure.regions.len(), 2);
        let france = figure
            .regions
            .iter()
            .find(|r| r.iso3c == "FRA")
            .unwrap();
        assert_eq!(france.value, 110.0);
    }

    #[test]
    fn test_unknown_indicator_rejected() {
        let catalog = IndicatorCatalog::world_bank_defaults();
        let req = ChoroplethRequest {
            indicator: "XX.NOPE".to_string(),
            start_year: 2010,
            end_year: 2012,
        };

        assert!(matches!(
            build_choropleth(&table(), &catalog, &req),
            Err(ChartError::UnknownIndicator(_))
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let catalog = IndicatorCatalog::world_bank_defaults();
        assert!(matches!(
            build_choropleth(&table(), &catalog, &request(2012, 2010)),
            Err(ChartError::InvalidYearRange { .. })
        ));
    }
}
