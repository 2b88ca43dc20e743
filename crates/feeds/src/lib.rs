//! Periodic data feeds: fetchers, the subscription bus, and the scheduler.
//!
//! A [`PollScheduler`] drives one [`Fetcher`] on a fixed cadence and fans
//! each successful result out through a [`SubscriptionBus`]. A failed cycle
//! is logged and skipped; the loop itself never dies.

pub mod bus;
pub mod error;
pub mod fetcher;
pub mod price;
pub mod scheduler;
pub mod tvl;

pub use bus::{Subscriber, SubscriptionBus};
pub use error::{FetchError, ObserverError};
pub use fetcher::Fetcher;
pub use price::PriceFetcher;
pub use scheduler::PollScheduler;
pub use tvl::TvlFetcher;
