//! World Bank API Client
//!
//! HTTP client for the World Bank API v2. Responses use a paged
//! envelope: a two-element JSON array of `[page metadata, rows]`.
//! The client requests a large `per_page` and follows `pages`, so a
//! single page is the common case.

use super::{SnapshotSource, SourceError};
use crate::dataset::{CountrySourceRow, CountryTable, IndicatorCatalog, IndicatorTable, Observation};
use crate::store::Snapshot;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Configuration for the World Bank client
#[derive(Debug, Clone)]
pub struct WorldBankConfig {
    /// Base URL for the API (e.g., "https://api.worldbank.org/v2")
    pub base_url: String,
    /// First year of the download window (inclusive)
    pub year_start: i32,
    /// Last year of the download window (inclusive)
    pub year_end: i32,
    /// Rows per page to request
    pub per_page: u32,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum retry attempts per request
    pub max_retries: u32,
}

impl Default for WorldBankConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.worldbank.org/v2".to_string(),
            year_start: 2005,
            year_end: 2016,
            per_page: 20_000,
            request_timeout_ms: 10_000,
            max_retries: 3,
        }
    }
}

/// World Bank API client
pub struct WorldBankClient {
    client: Client,
    config: WorldBankConfig,
    catalog: IndicatorCatalog,
}

impl WorldBankClient {
    /// Create a client for the given catalog of indicators
    pub fn new(config: WorldBankConfig, catalog: IndicatorCatalog) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            config,
            catalog,
        })
    }

    pub fn config(&self) -> &WorldBankConfig {
        &self.config
    }

    /// Download and clean the country listing
    pub async fn fetch_countries(&self) -> Result<CountryTable, SourceError> {
        let url = format!("{}/country", self.config.base_url);
        let rows = self.fetch_pages(&url, &[]).await?;

        let source_rows = rows
            .into_iter()
            .map(|row| {
                let raw: RawCountry = serde_json::from_value(row)
                    .map_err(|e| SourceError::Decode(format!("country row: {}", e)))?;
                Ok(CountrySourceRow {
                    name: raw.name,
                    iso3c: raw.id,
                    capital_city: raw.capital_city.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, SourceError>>()?;

        Ok(CountryTable::from_source_rows(source_rows))
    }

    /// Download all observations for one indicator over the year window.
    /// Null observations and rows without an ISO code are dropped.
    pub async fn fetch_indicator(&self, code: &str) -> Result<Vec<Observation>, SourceError> {
        let url = format!("{}/country/all/indicator/{}", self.config.base_url, code);
        let date = format!("{}:{}", self.config.year_start, self.config.year_end);
        let rows = self.fetch_pages(&url, &[("date", date.as_str())]).await?;

        let mut observations = Vec::new();
        for row in rows {
            let raw: RawObservation = serde_json::from_value(row)
                .map_err(|e| SourceError::Decode(format!("observation row: {}", e)))?;

            let Some(value) = raw.value else { continue };
            if raw.countryiso3code.is_empty() {
                continue;
            }
            let Ok(year) = raw.date.parse::<i32>() else {
                continue;
            };

            observations.push(Observation {
                iso3c: raw.countryiso3code,
                year,
                indicator: code.to_string(),
                value,
            });
        }

        Ok(observations)
    }

    /// Fetch every page of an endpoint, returning the concatenated rows
    async fn fetch_pages(
        &self,
        url: &str,
        extra_query: &[(&str, &str)],
    ) -> Result<Vec<Value>, SourceError> {
        let per_page = self.config.per_page.to_string();
        let mut all_rows = Vec::new();
        let mut page = 1u32;

        loop {
            let page_str = page.to_string();
            let mut query: Vec<(&str, &str)> = vec![
                ("format", "json"),
                ("per_page", per_page.as_str()),
                ("page", page_str.as_str()),
            ];
            query.extend_from_slice(extra_query);

            let body = self.get_with_retry(url, &query).await?;
            let (meta, mut rows) = parse_envelope(body)?;
            all_rows.append(&mut rows);

            if page >= meta.pages {
                break;
            }
            page += 1;
        }

        Ok(all_rows)
    }

    /// GET a URL with bounded retry, classifying transport failures
    async fn get_with_retry(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, SourceError> {
        let mut last_error = SourceError::Unavailable;

        for attempt in 0..self.config.max_retries {
            if attempt > 0 {
                let delay = std::time::Duration::from_secs((attempt as u64).pow(2));
                tokio::time::sleep(delay).await;
            }

            match self.client.get(url).query(query).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return response
                            .json::<Value>()
                            .await
                            .map_err(|e| SourceError::Decode(e.to_string()));
                    }

                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    if status.is_server_error() {
                        last_error = SourceError::Api {
                            status: status.as_u16(),
                            message: text,
                        };
                        continue;
                    }
                    return Err(SourceError::Api {
                        status: status.as_u16(),
                        message: text,
                    });
                }
                Err(e) => {
                    last_error = if e.is_timeout() {
                        SourceError::Timeout
                    } else if e.is_connect() {
                        SourceError::Unavailable
                    } else {
                        SourceError::Request(e)
                    };
                    continue;
                }
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl SnapshotSource for WorldBankClient {
    fn name(&self) -> &str {
        "worldbank"
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, SourceError> {
        let countries = self.fetch_countries().await?;
        tracing::debug!(countries = countries.len(), "Fetched country listing");

        let mut observations = Vec::new();
        for code in self.catalog.codes() {
            let mut obs = self.fetch_indicator(code).await?;
            tracing::debug!(indicator = code, rows = obs.len(), "Fetched indicator");
            observations.append(&mut obs);
        }

        let indicators = IndicatorTable::from_observations(observations, &countries);
        Ok(Snapshot::new(countries, indicators))
    }
}

/// Split a `[meta, rows]` envelope. Error payloads arrive as a
/// one-element array carrying a `message` list.
fn parse_envelope(body: Value) -> Result<(PageMeta, Vec<Value>), SourceError> {
    let Value::Array(mut parts) = body else {
        return Err(SourceError::Decode("expected envelope array".to_string()));
    };

    if parts.len() < 2 {
        let message = parts
            .first()
            .and_then(|m| m.get("message"))
            .map(|m| m.to_string())
            .unwrap_or_else(|| "missing rows element".to_string());
        return Err(SourceError::Decode(format!("error envelope: {}", message)));
    }

    let rows = match parts.remove(1) {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        other => {
            return Err(SourceError::Decode(format!(
                "expected rows array, got {}",
                other
            )))
        }
    };

    let meta: PageMeta = serde_json::from_value(parts.remove(0))
        .map_err(|e| SourceError::Decode(format!("page metadata: {}", e)))?;

    Ok((meta, rows))
}

// ============================================
// Wire DTOs
// ============================================

#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(default = "one")]
    pages: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    id: String,
    name: String,
    #[serde(rename = "capitalCity")]
    capital_city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    #[serde(default)]
    countryiso3code: String,
    date: String,
    value: Option<f64>,
}
