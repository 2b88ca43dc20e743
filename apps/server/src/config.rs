//! Application configuration.

use pulse_alerts::DigestSchedule;
use pulse_core::AthRecord;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Application configuration, loaded from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite URL for the durable key-value state.
    pub database_url: String,
    /// Logging level.
    pub log_level: String,
    /// Price source settings.
    pub price: PriceSourceSettings,
    /// TVL source settings.
    pub tvl: TvlSourceSettings,
    /// Daily digest and ATH settings.
    pub digest: DigestSettings,
    /// Delivery targets handed to the notification sink.
    pub recipients: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://pulse.db".to_string(),
            log_level: "info".to_string(),
            price: PriceSourceSettings::default(),
            tvl: TvlSourceSettings::default(),
            digest: DigestSettings::default(),
            recipients: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file; a missing or invalid file falls back to
    /// defaults rather than refusing to start.
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path, error = %e, "Invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path, "No config file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn schedule(&self) -> DigestSchedule {
        DigestSchedule {
            hour: self.digest.hour,
            minute: self.digest.minute,
        }
    }

    pub fn ath_baseline(&self) -> AthRecord {
        AthRecord::new(
            self.digest.ath_baseline_timestamp,
            self.digest.ath_baseline_value,
        )
    }
}

/// Price source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSourceSettings {
    /// Coin identifier on the price API.
    pub coin_id: String,
    /// Fetch period in seconds.
    pub fetch_period_secs: u64,
    /// One-time delay before the first cycle, seconds.
    pub startup_delay_secs: u64,
}

impl Default for PriceSourceSettings {
    fn default() -> Self {
        Self {
            coin_id: "alpha-finance".to_string(),
            fetch_period_secs: 60,
            startup_delay_secs: 3,
        }
    }
}

/// TVL source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvlSourceSettings {
    /// API key for the TVL projects endpoint.
    pub api_key: String,
    /// Protocol name to watch in the project list.
    pub protocol_name: String,
    /// Fetch period in seconds.
    pub fetch_period_secs: u64,
}

impl Default for TvlSourceSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            protocol_name: "Alpha Homora".to_string(),
            fetch_period_secs: 3600,
        }
    }
}

/// Daily digest and ATH settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestSettings {
    /// Local hour the digest becomes due.
    pub hour: u32,
    /// Local minute the digest becomes due.
    pub minute: u32,
    /// Seed for the all-time-high record: when the baseline was set.
    pub ath_baseline_timestamp: i64,
    /// Seed for the all-time-high record: the known historical high.
    pub ath_baseline_value: f64,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            hour: 10,
            minute: 0,
            ath_baseline_timestamp: 1_605_000_000,
            ath_baseline_value: 2.93,
        }
    }
}
