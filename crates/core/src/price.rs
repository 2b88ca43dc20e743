//! Price data produced by the price feed.

use crate::{AthRecord, TvlEntry};
use serde::{Deserialize, Serialize};

/// One observation from the price API.
///
/// The upstream payload routinely omits optional market fields; absent
/// numerics resolve to zero at parse time rather than failing the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceSnapshot {
    /// Price in USD.
    pub usd: f64,
    /// Price in BTC.
    pub btc: f64,
    /// Market capitalization in USD.
    pub usd_market_cap: f64,
    /// 24h price change, percent.
    pub usd_24h_change: f64,
    /// Market-cap rank; 0 when unranked.
    pub rank: u32,
}

/// The data a notification carries: the fresh snapshot plus persisted
/// history. Rendering is the sink's problem, never this crate's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceReport {
    /// The snapshot that triggered the decision.
    pub price: PriceSnapshot,
    /// Latest TVL entry for the watched protocol, if one has been kept.
    pub tvl: Option<TvlEntry>,
    /// The all-time-high record as it stood before this cycle.
    pub previous_ath: AthRecord,
    /// Whether this cycle set a new all-time high.
    pub is_ath: bool,
}
