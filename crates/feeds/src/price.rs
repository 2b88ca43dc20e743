//! Coin price fetcher against a CoinGecko-style API.

use crate::{FetchError, Fetcher};
use async_trait::async_trait;
use pulse_core::PriceSnapshot;
use tracing::debug;

/// Fetches the watched coin's price data and market-cap rank.
///
/// Two GETs per cycle, issued concurrently: the simple-price endpoint for
/// prices and market data, and the coin endpoint for the rank. One
/// long-lived client; nothing else is reacquired per cycle.
pub struct PriceFetcher {
    client: reqwest::Client,
    coin_id: String,
    base_url: String,
}

impl PriceFetcher {
    const BASE_URL: &'static str = "https://api.coingecko.com/api/v3";

    pub fn new(coin_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            coin_id: coin_id.into(),
            base_url: Self::BASE_URL.to_string(),
        }
    }

    fn price_url(&self) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies=usd%2Cbtc&include_market_cap=true&include_24hr_change=true",
            self.base_url, self.coin_id
        )
    }

    fn rank_url(&self) -> String {
        format!(
            "{}/coins/{}?localization=false&tickers=false&market_data=false&\
             community_data=false&developer_data=false&sparkline=false",
            self.base_url, self.coin_id
        )
    }

    /// Extract the snapshot from a simple-price payload. Absent numeric
    /// fields resolve to zero; only a missing coin object is an error.
    pub fn parse_price_payload(
        json: &serde_json::Value,
        coin_id: &str,
    ) -> Result<PriceSnapshot, FetchError> {
        let coin = json
            .get(coin_id)
            .ok_or_else(|| FetchError::Parse(format!("No '{coin_id}' object in price payload")))?;

        Ok(PriceSnapshot {
            usd: coin["usd"].as_f64().unwrap_or(0.0),
            btc: coin["btc"].as_f64().unwrap_or(0.0),
            usd_market_cap: coin["usd_market_cap"].as_f64().unwrap_or(0.0),
            usd_24h_change: coin["usd_24h_change"].as_f64().unwrap_or(0.0),
            rank: 0,
        })
    }

    /// Extract the market-cap rank from a coin payload; unranked coins
    /// report zero.
    pub fn parse_rank_payload(json: &serde_json::Value) -> u32 {
        json["market_cap_rank"].as_u64().unwrap_or(0) as u32
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Fetcher for PriceFetcher {
    type Output = PriceSnapshot;

    async fn fetch(&self) -> Result<PriceSnapshot, FetchError> {
        let price_url = self.price_url();
        let rank_url = self.rank_url();
        let (price_json, rank_json) = tokio::try_join!(
            self.get_json(&price_url),
            self.get_json(&rank_url)
        )?;

        let mut snapshot = Self::parse_price_payload(&price_json, &self.coin_id)?;
        snapshot.rank = Self::parse_rank_payload(&rank_json);
        debug!(coin = %self.coin_id, usd = snapshot.usd, rank = snapshot.rank, "Fetched price");
        Ok(snapshot)
    }

    fn source_id(&self) -> &str {
        "price"
    }
}
