//! Country Lookup Table
//!
//! Maps country names to ISO-3166 alpha-3 codes. Built from the World
//! Bank country listing, which mixes real countries with regional
//! aggregates ("World", "Euro area", ...). Aggregates carry no capital
//! city, so rows with an empty capital are dropped, along with Kosovo
//! (no ISO-3166 code upstream).

use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One row as delivered by the upstream country listing, before cleaning
#[derive(Debug, Clone)]
pub struct CountrySourceRow {
    pub name: String,
    pub iso3c: String,
    pub capital_city: String,
}

/// A cleaned country entry
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CountryEntry {
    pub iso3c: String,
    pub country: String,
}

/// Cleaned country lookup, sorted by country name
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    rows: Vec<CountryEntry>,
    by_iso: HashMap<String, usize>,
}

impl CountryTable {
    /// Build the lookup from raw source rows, applying the cleaning rules:
    /// drop rows with an empty capital city, drop Kosovo, drop rows with
    /// a blank name or code, and dedupe on the ISO code.
    pub fn from_source_rows(raw: impl IntoIterator<Item = CountrySourceRow>) -> Self {
        let mut rows: Vec<CountryEntry> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for row in raw {
            let name = row.name.trim();
            let iso3c = row.iso3c.trim();

            if row.capital_city.trim().is_empty() {
                continue;
            }
            if name.is_empty() || iso3c.is_empty() || name == "Kosovo" {
                continue;
            }
            if !seen.insert(iso3c.to_string()) {
                continue;
            }

            rows.push(CountryEntry {
                iso3c: iso3c.to_string(),
                country: name.to_string(),
            });
        }

        rows.sort_by(|a, b| a.country.cmp(&b.country));

        let by_iso = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.iso3c.clone(), i))
            .collect();

        Self { rows, by_iso }
    }

    /// Number of countries in the lookup
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Country name for an ISO code, if present
    pub fn name_for(&self, iso3c: &str) -> Option<&str> {
        self.by_iso
            .get(iso3c)
            .map(|&i| self.rows[i].country.as_str())
    }

    /// Whether an ISO code survives the cleaning (the join-key test)
    pub fn contains(&self, iso3c: &str) -> bool {
        self.by_iso.contains_key(iso3c)
    }

    /// All entries, sorted by country name
    pub fn entries(&self) -> &[CountryEntry] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, iso3c: &str, capital: &str) -> CountrySourceRow {
        CountrySourceRow {
            name: name.to_string(),
            iso3c: iso3c.to_string(),
            capital_city: capital.to_string(),
        }
    }

    #[test]
    fn test_drops_aggregates_without_capital() {
        let table = CountryTable::from_source_rows(vec![
            raw("World", "WLD", ""),
            raw("Euro area", "EMU", ""),
            raw("France", "FRA", "Paris"),
        ]);

        assert_eq!(table.len(), 1);
        assert!(table.contains("FRA"));
        assert!(!table.contains("WLD"));
    }

    #[test]
    fn test_drops_kosovo() {
        let table = CountryTable::from_source_rows(vec![
            raw("Kosovo", "XKX", "Pristina"),
            raw("Albania", "ALB", "Tirana"),
        ]);

        assert_eq!(table.len(), 1);
        assert!(!table.contains("XKX"));
    }

    #[test]
    fn test_sorted_and_deduped() {
        let table = CountryTable::from_source_rows(vec![
            raw("Germany", "DEU", "Berlin"),
            raw("Austria", "AUT", "Vienna"),
            raw("Germany", "DEU", "Berlin"),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].country, "Austria");
        assert_eq!(table.name_for("DEU"), Some("Germany"));
    }
}
