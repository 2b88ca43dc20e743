//! Durable key-value state for the pulse bot.
//!
//! The long-term store is an external collaborator; this crate defines the
//! boundary ([`KeyValueStore`]) and ships two adapters: a SQLite-backed one
//! for real runs and an in-memory one for tests and ephemeral runs.

pub mod kv;
pub mod memory;
pub mod sqlite;

pub use kv::{decode_or_default, KeyValueStore, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
