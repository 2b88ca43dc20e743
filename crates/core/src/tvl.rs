//! Protocol TVL entries from the TVL API.

use serde::{Deserialize, Serialize};

/// One protocol row from the TVL projects endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TvlEntry {
    pub category: String,
    pub chain: String,
    pub id: u64,
    pub name: String,
    /// Total value locked in USD.
    pub tvl_usd: f64,
    /// 1-day relative change, percent.
    pub tvl_usd_relative_1d: f64,
}

impl TvlEntry {
    /// Find a protocol by exact name in a fetched project list.
    pub fn find_by_name<'a>(entries: &'a [TvlEntry], name: &str) -> Option<&'a TvlEntry> {
        entries.iter().find(|e| e.name == name)
    }
}
