//! The fetch capability.

use crate::FetchError;
use async_trait::async_trait;

/// One network round-trip per cycle, producing a typed result.
///
/// Fetchers never retry on their own; a failed cycle is retried by waiting
/// for the scheduler's next tick.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// The payload one successful cycle produces.
    type Output: Clone + Send + Sync + 'static;

    /// Perform the round-trip.
    async fn fetch(&self) -> Result<Self::Output, FetchError>;

    /// Stable identifier passed to subscribers with each payload.
    fn source_id(&self) -> &str;
}
