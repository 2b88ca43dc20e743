//! Keeps the latest TVL project list in the store.

use async_trait::async_trait;
use pulse_core::TvlEntry;
use pulse_feeds::{ObserverError, Subscriber};
use pulse_store::{decode_or_default, KeyValueStore, StoreError};
use std::sync::Arc;
use tracing::warn;

const LAST_TVL_KEY: &str = "tvl:last";

/// Persists each fetched project list and answers "what did we last see
/// for the watched protocol" — the digest report reads through here, so
/// the two schedulers share nothing but the store.
pub struct TvlKeeper {
    store: Arc<dyn KeyValueStore>,
    protocol_name: String,
}

impl TvlKeeper {
    pub fn new(store: Arc<dyn KeyValueStore>, protocol_name: impl Into<String>) -> Self {
        Self {
            store,
            protocol_name: protocol_name.into(),
        }
    }

    /// The most recently persisted project list; empty when none is stored.
    pub async fn last_state(&self) -> Vec<TvlEntry> {
        match self.store.get(LAST_TVL_KEY).await {
            Ok(bytes) => decode_or_default(LAST_TVL_KEY, bytes),
            Err(e) => {
                warn!(error = %e, "Store read failed, treating TVL state as empty");
                Vec::new()
            }
        }
    }

    /// The watched protocol's latest entry, if present.
    pub async fn watched_protocol(&self) -> Option<TvlEntry> {
        let entries = self.last_state().await;
        TvlEntry::find_by_name(&entries, &self.protocol_name).cloned()
    }

    async fn save(&self, entries: &[TvlEntry]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(entries)?;
        self.store.set(LAST_TVL_KEY, &bytes).await
    }
}

#[async_trait]
impl Subscriber<Vec<TvlEntry>> for TvlKeeper {
    async fn on_data(&self, _source: &str, data: Vec<TvlEntry>) -> Result<(), ObserverError> {
        self.save(&data).await.map_err(ObserverError::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulse_store::MemoryStore;

    fn entry(name: &str, tvl: f64) -> TvlEntry {
        TvlEntry {
            name: name.to_string(),
            tvl_usd: tvl,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_keeper_persists_and_reads_back() {
        let store = Arc::new(MemoryStore::new());
        let keeper = TvlKeeper::new(store, "Alpha Homora");

        assert!(keeper.last_state().await.is_empty());
        assert_eq!(keeper.watched_protocol().await, None);

        let entries = vec![entry("Maker", 1.0e9), entry("Alpha Homora", 1.6e7)];
        keeper.on_data("tvl", entries.clone()).await.unwrap();

        assert_eq!(keeper.last_state().await, entries);
        assert_eq!(
            keeper.watched_protocol().await,
            Some(entry("Alpha Homora", 1.6e7))
        );
    }

    #[tokio::test]
    async fn test_new_list_overwrites_the_old() {
        let store = Arc::new(MemoryStore::new());
        let keeper = TvlKeeper::new(store, "Alpha Homora");

        keeper
            .on_data("tvl", vec![entry("Alpha Homora", 1.0)])
            .await
            .unwrap();
        keeper
            .on_data("tvl", vec![entry("Alpha Homora", 2.0)])
            .await
            .unwrap();

        assert_eq!(
            keeper.watched_protocol().await,
            Some(entry("Alpha Homora", 2.0))
        );
    }
}
