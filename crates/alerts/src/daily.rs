//! Once-a-day gate over durable state.

use chrono::{Local, NaiveDate};
use pulse_store::{KeyValueStore, StoreError};
use std::sync::Arc;
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tracks "already notified today" per event name.
///
/// The comparison is calendar-day equality on the stored `YYYY-MM-DD`
/// string, never elapsed seconds. A missing or unreadable record permits.
pub struct DailyGate {
    store: Arc<dyn KeyValueStore>,
    event_name: String,
}

impl DailyGate {
    pub fn new(store: Arc<dyn KeyValueStore>, event_name: impl Into<String>) -> Self {
        Self {
            store,
            event_name: event_name.into(),
        }
    }

    fn key(&self) -> String {
        format!("once-a-day:{}", self.event_name)
    }

    async fn read(&self) -> Option<String> {
        match self.store.get(&self.key()).await {
            Ok(Some(bytes)) => String::from_utf8(bytes).ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(event = %self.event_name, error = %e, "Store read failed, treating gate as open");
                None
            }
        }
    }

    /// True unless the stored day equals today.
    pub async fn can_fire(&self) -> bool {
        self.can_fire_on(Local::now().date_naive()).await
    }

    pub async fn can_fire_on(&self, day: NaiveDate) -> bool {
        let today = day.format(DATE_FORMAT).to_string();
        self.read().await.as_deref() != Some(today.as_str())
    }

    /// Record today's date, overwriting any prior value.
    pub async fn write_today(&self) -> Result<(), StoreError> {
        self.write_day(Local::now().date_naive()).await
    }

    pub async fn write_day(&self, day: NaiveDate) -> Result<(), StoreError> {
        let value = day.format(DATE_FORMAT).to_string();
        self.store.set(&self.key(), value.as_bytes()).await
    }

    /// Delete the record.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.delete(&self.key()).await
    }
}
