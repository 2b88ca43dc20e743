//! Generic rate limiter over durable state, keyed by event name.

use chrono::Utc;
use pulse_core::CooldownRecord;
use pulse_store::{decode_or_default, KeyValueStore, StoreError};
use std::sync::Arc;
use tracing::warn;

/// "Allow N uses per cooldown window", persisted per event name.
///
/// `max_times = 1` degenerates to one use per window. A missing or corrupt
/// record always permits: one extra notification beats silently withholding
/// them forever.
pub struct Cooldown {
    store: Arc<dyn KeyValueStore>,
    event_name: String,
    cooldown_secs: i64,
    max_times: u32,
}

impl Cooldown {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        event_name: impl Into<String>,
        cooldown_secs: i64,
        max_times: u32,
    ) -> Self {
        Self {
            store,
            event_name: event_name.into(),
            cooldown_secs,
            max_times,
        }
    }

    fn key(&self) -> String {
        format!("cooldown:{}", self.event_name)
    }

    async fn read(&self) -> CooldownRecord {
        let key = self.key();
        match self.store.get(&key).await {
            Ok(bytes) => decode_or_default(&key, bytes),
            Err(e) => {
                warn!(event = %self.event_name, error = %e, "Store read failed, treating cooldown as open");
                CooldownRecord::default()
            }
        }
    }

    async fn write(&self, record: &CooldownRecord) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(record)?;
        self.store.set(&self.key(), &bytes).await
    }

    /// True when the event may fire now.
    pub async fn can_fire(&self) -> bool {
        self.can_fire_at(Utc::now().timestamp()).await
    }

    pub async fn can_fire_at(&self, now: i64) -> bool {
        self.read().await.can_fire(now, self.cooldown_secs)
    }

    /// Spend one use. A no-op while the window is closed; the closing use
    /// stamps `last_fired` and resets the counter.
    pub async fn fire(&self) -> Result<(), StoreError> {
        self.fire_at(Utc::now().timestamp()).await
    }

    pub async fn fire_at(&self, now: i64) -> Result<(), StoreError> {
        let mut record = self.read().await;
        if !record.can_fire(now, self.cooldown_secs) {
            return Ok(());
        }
        record.register_use(now, self.max_times);
        self.write(&record).await
    }

    /// Reset the record to its zero state.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.write(&CooldownRecord::default()).await
    }
}
