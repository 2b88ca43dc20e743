//! Protocol TVL fetcher against a DefiPulse-style projects API.

use crate::{FetchError, Fetcher};
use async_trait::async_trait;
use pulse_core::TvlEntry;
use tracing::debug;

/// Fetches the full project list from the TVL API. One GET per cycle,
/// api-key in the query string.
pub struct TvlFetcher {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TvlFetcher {
    const BASE_URL: &'static str = "https://data-api.defipulse.com/api/v1/defipulse/api";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: Self::BASE_URL.to_string(),
        }
    }

    fn projects_url(&self) -> String {
        format!("{}/GetProjects?api-key={}", self.base_url, self.api_key)
    }

    /// Parse the projects array. Fields are extracted one by one; absent
    /// fields take their defaults. Only a non-array payload is an error.
    pub fn parse_projects(json: &serde_json::Value) -> Result<Vec<TvlEntry>, FetchError> {
        let items = json
            .as_array()
            .ok_or_else(|| FetchError::Parse("Projects payload is not an array".to_string()))?;

        Ok(items.iter().map(Self::parse_entry).collect())
    }

    fn parse_entry(item: &serde_json::Value) -> TvlEntry {
        // TVL lives under the nested value.tvl.USD object.
        let tvl_usd = &item["value"]["tvl"]["USD"];

        TvlEntry {
            category: item["category"].as_str().unwrap_or("").to_string(),
            chain: item["chain"].as_str().unwrap_or("").to_string(),
            id: item["id"].as_u64().unwrap_or(0),
            name: item["name"].as_str().unwrap_or("").to_string(),
            tvl_usd: tvl_usd["value"].as_f64().unwrap_or(0.0),
            tvl_usd_relative_1d: tvl_usd["relative_1d"].as_f64().unwrap_or(0.0),
        }
    }
}

#[async_trait]
impl Fetcher for TvlFetcher {
    type Output = Vec<TvlEntry>;

    async fn fetch(&self) -> Result<Vec<TvlEntry>, FetchError> {
        let response = self.client.get(self.projects_url()).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let json: serde_json::Value = response.json().await?;
        let entries = Self::parse_projects(&json)?;
        debug!(projects = entries.len(), "Fetched TVL project list");
        Ok(entries)
    }

    fn source_id(&self) -> &str {
        "tvl"
    }
}
