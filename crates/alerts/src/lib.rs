//! Alert decision engines over durable key-value state.
//!
//! This crate provides:
//! - Cooldown rate limiting keyed by event name
//! - A once-a-day calendar gate
//! - All-time-high tracking with a seeded baseline
//! - The digest decision logic combining them once per price cycle

pub mod ath;
pub mod cooldown;
pub mod daily;
pub mod digest;
pub mod keeper;
pub mod sink;

pub use ath::AthTracker;
pub use cooldown::Cooldown;
pub use daily::DailyGate;
pub use digest::{DigestEngine, DigestError, DigestSchedule};
pub use keeper::TvlKeeper;
pub use sink::{LogSink, NotificationSink, SinkError};
