//! Indicator Catalog and Table
//!
//! The catalog is the fixed set of World Bank indicators the dashboard
//! offers, keyed by API code with a human-readable display label. The
//! table holds one row per (country, year) with the values observed
//! for each indicator, joined against the country lookup.

use super::country::CountryTable;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// A cataloged indicator: the World Bank series code and its display label
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Indicator {
    pub code: String,
    pub label: String,
}

/// The set of indicators the dashboards expose
#[derive(Debug, Clone)]
pub struct IndicatorCatalog {
    indicators: Vec<Indicator>,
}

impl IndicatorCatalog {
    /// The three indicators from the World Bank comparison dashboard
    pub fn world_bank_defaults() -> Self {
        Self::new(vec![
            (
                "IT.NET.USER.ZS",
                "Individuals using the Internet (% of population)",
            ),
            (
                "SG.GEN.PARL.ZS",
                "Proportion of seats held by women in national parliaments (%)",
            ),
            ("EN.ATM.CO2E.KT", "CO2 emissions (kt)"),
        ])
    }

    pub fn new(entries: Vec<(&str, &str)>) -> Self {
        let indicators = entries
            .into_iter()
            .map(|(code, label)| Indicator {
                code: code.to_string(),
                label: label.to_string(),
            })
            .collect();
        Self { indicators }
    }

    /// Display label for a code, if cataloged
    pub fn label_for(&self, code: &str) -> Option<&str> {
        self.indicators
            .iter()
            .find(|i| i.code == code)
            .map(|i| i.label.as_str())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.indicators.iter().any(|i| i.code == code)
    }

    /// All codes, in catalog order
    pub fn codes(&self) -> Vec<&str> {
        self.indicators.iter().map(|i| i.code.as_str()).collect()
    }

    /// All indicators, in catalog order
    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }
}

/// One observation as delivered by the source: a single indicator value
/// for a country and year
#[derive(Debug, Clone)]
pub struct Observation {
    pub iso3c: String,
    pub year: i32,
    pub indicator: String,
    pub value: f64,
}

/// One table row: all indicator values observed for a country and year
#[derive(Debug, Clone)]
pub struct IndicatorRow {
    pub iso3c: String,
    pub country: String,
    pub year: i32,
    pub values: HashMap<String, f64>,
}

/// A per-country value, the unit of choropleth output
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountryValue {
    pub iso3c: String,
    pub country: String,
    pub value: f64,
}

/// The joined (country, year) indicator table, sorted by country then year
#[derive(Debug, Clone, Default)]
pub struct IndicatorTable {
    rows: Vec<IndicatorRow>,
}

impl IndicatorTable {
    /// Join observations against the country lookup. Observations whose
    /// ISO code is missing from the lookup are dropped; the country name
    /// column comes from the lookup.
    pub fn from_observations(
        observations: impl IntoIterator<Item = Observation>,
        countries: &CountryTable,
    ) -> Self {
        let mut grouped: BTreeMap<(String, String, i32), HashMap<String, f64>> = BTreeMap::new();

        for obs in observations {
            let Some(country) = countries.name_for(&obs.iso3c) else {
                continue;
            };

            grouped
                .entry((country.to_string(), obs.iso3c.clone(), obs.year))
                .or_default()
                .insert(obs.indicator, obs.value);
        }

        let rows = grouped
            .into_iter()
            .map(|((country, iso3c, year), values)| IndicatorRow {
                iso3c,
                country,
                year,
                values,
            })
            .collect();

        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    /// Per-country mean of one indicator over an inclusive year range.
    /// Rows without a value for the indicator are skipped, matching
    /// NaN-skipping mean semantics.
    pub fn mean_by_country(&self, code: &str, start_year: i32, end_year: i32) -> Vec<CountryValue> {
        let mut acc: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();

        for row in &self.rows {
            if row.year < start_year || row.year > end_year {
                continue;
            }
            let Some(&value) = row.values.get(code) else {
                continue;
            };

            let entry = acc
                .entry((row.country.clone(), row.iso3c.clone()))
                .or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }

        acc.into_iter()
            .map(|((country, iso3c), (sum, count))| CountryValue {
                iso3c,
                country,
                value: sum / count as f64,
            })
            .collect()
    }

    /// Per-country values of one indicator for a single year, unaggregated
    pub fn single_year(&self, code: &str, year: i32) -> Vec<CountryValue> {
        self.rows
            .iter()
            .filter(|row| row.year == year)
            .filter_map(|row| {
                row.values.get(code).map(|&value| CountryValue {
                    iso3c: row.iso3c.clone(),
                    country: row.country.clone(),
                    value,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CountrySourceRow;

    fn countries() -> CountryTable {
        CountryTable::from_source_rows(vec![
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
        ])
    }

    fn obs(iso3c: &str, year: i32, indicator: &str, value: f64) -> Observation {
        Observation {
            iso3c: iso3c.to_string(),
            year,
            indicator: indicator.to_string(),
            value,
        }
    }

    #[test]
    fn test_join_drops_unknown_iso() {
        let table = IndicatorTable::from_observations(
            vec![
                obs("FRA", 2010, "IT.NET.USER.ZS", 77.0),
                obs("WLD", 2010, "IT.NET.USER.ZS", 30.0),
            ],
            &countries(),
        );

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].country, "France");
    }

    #[test]
    fn test_mean_by_country_inclusive_range() {
        let table = IndicatorTable::from_observations(
            vec![
                obs("FRA", 2010, "EN.ATM.CO2E.KT", 100.0),
                obs("FRA", 2011, "EN.ATM.CO2E.KT", 200.0),
                obs("FRA", 2012, "EN.ATM.CO2E.KT", 900.0),
                obs("DEU", 2010, "EN.ATM.CO2E.KT", 50.0),
            ],
            &countries(),
        );

        let values = table.mean_by_country("EN.ATM.CO2E.KT", 2010, 2011);
        assert_eq!(values.len(), 2);
        // Sorted by country name
        assert_eq!(values[0].country, "France");
        assert_eq!(values[0].value, 150.0);
        assert_eq!(values[1].country, "Germany");
        assert_eq!(values[1].value, 50.0);
    }

    #[test]
    fn test_mean_skips_rows_missing_indicator() {
        let table = IndicatorTable::from_observations(
            vec![
                obs("FRA", 2010, "EN.ATM.CO2E.KT", 100.0),
                obs("FRA", 2011, "IT.NET.USER.ZS", 70.0),
            ],
            &countries(),
        );

        let values = table.mean_by_country("EN.ATM.CO2E.KT", 2010, 2011);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value, 100.0);
    }

    #[test]
    fn test_single_year_passthrough() {
        let table = IndicatorTable::from_observations(
            vec![
                obs("FRA", 2010, "SG.GEN.PARL.ZS", 18.9),
                obs("FRA", 2011, "SG.GEN.PARL.ZS", 20.0),
            ],
            &countries(),
        );

        let values = table.single_year("SG.GEN.PARL.ZS", 2010);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value, 18.9);
    }

    #[test]
    fn test_catalog_labels() {
        let catalog = IndicatorCatalog::world_bank_defaults();
        assert_eq!(catalog.indicators().len(), 3);
        assert!(catalog.contains("EN.ATM.CO2E.KT"));
        assert_eq!(
            catalog.label_for("IT.NET.USER.ZS"),
            Some("Individuals using the Internet (% of population)")
        );
        assert!(catalog.label_for("XX.NOPE").is_none());
    }
}
