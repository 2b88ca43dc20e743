//! All-time-high tracking over durable state.

use chrono::Utc;
use pulse_core::AthRecord;
use pulse_store::{KeyValueStore, StoreError};
use std::sync::Arc;
use tracing::{info, warn};

/// Tracks a monotonically increasing record value under one key.
///
/// Absent or corrupt state falls back to the configured baseline, not the
/// zero record: against empty state, zero would declare a false high on the
/// very first cycle.
pub struct AthTracker {
    store: Arc<dyn KeyValueStore>,
    key: String,
    baseline: AthRecord,
}

impl AthTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, baseline: AthRecord) -> Self {
        Self {
            store,
            key: key.into(),
            baseline,
        }
    }

    /// The stored record, or the baseline when absent or corrupt.
    pub async fn previous(&self) -> AthRecord {
        match self.store.get(&self.key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(record) => record,
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Corrupt record, falling back to baseline");
                    self.baseline
                }
            },
            Ok(None) => self.baseline,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Store read failed, falling back to baseline");
                self.baseline
            }
        }
    }

    /// Persist `{now, candidate}` and return true iff the candidate beats
    /// the previous record strictly; otherwise leave the stored bytes
    /// untouched. This method is the single writer of the key.
    pub async fn update_if_new(&self, candidate: f64) -> Result<bool, StoreError> {
        self.update_if_new_at(candidate, Utc::now().timestamp()).await
    }

    pub async fn update_if_new_at(&self, candidate: f64, now: i64) -> Result<bool, StoreError> {
        let previous = self.previous().await;
        if !previous.is_new_high(candidate) {
            return Ok(false);
        }

        let record = AthRecord::new(now, candidate);
        let bytes = serde_json::to_vec(&record)?;
        self.store.set(&self.key, &bytes).await?;
        info!(key = %self.key, value = candidate, previous = previous.value, "New all-time high");
        Ok(true)
    }
}
