//! The key-value store boundary.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// External durable map with atomic per-key get/set.
///
/// Keys are plain strings, values are serialized records. No expiry, no
/// cross-key transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, overwriting any prior value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is a no-op.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Decode a stored record, degrading to the default on a missing key or
/// corrupt bytes. Record reads in the alert engines all go through here; a
/// parse failure must never reach the decision logic.
pub fn decode_or_default<T: DeserializeOwned + Default>(key: &str, bytes: Option<Vec<u8>>) -> T {
    match bytes {
        Some(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Corrupt record in store, using default");
                T::default()
            }
        },
        None => T::default(),
    }
}
