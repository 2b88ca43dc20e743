//! Periodic fetch driver.

use crate::{Fetcher, Subscriber, SubscriptionBus};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Drives one fetcher on a fixed cadence and publishes every successful
/// result to its subscribers.
///
/// The cadence is absolute: a failed or slow cycle does not shift the
/// offsets of later cycles. Each data source gets its own scheduler task;
/// a failure in one never touches another.
pub struct PollScheduler<F: Fetcher> {
    fetcher: F,
    period: Duration,
    startup_delay: Duration,
    bus: SubscriptionBus<F::Output>,
}

impl<F: Fetcher> PollScheduler<F> {
    /// Create a scheduler polling `fetcher` every `period`. The period must
    /// be non-zero.
    pub fn new(fetcher: F, period: Duration) -> Self {
        Self {
            fetcher,
            period,
            startup_delay: Duration::ZERO,
            bus: SubscriptionBus::new(),
        }
    }

    /// One-time extra delay before the first cycle, on top of the period.
    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    /// Register a subscriber. Must happen before [`run`](Self::run) starts.
    pub fn subscribe(&mut self, subscriber: Arc<dyn Subscriber<F::Output>>) {
        self.bus.subscribe(subscriber);
    }

    /// One cycle: fetch once, publish on success, log and move on otherwise.
    pub async fn run_cycle(&self) {
        match self.fetcher.fetch().await {
            Ok(data) => {
                debug!(source = self.fetcher.source_id(), "Fetch succeeded");
                self.bus.publish(self.fetcher.source_id(), &data).await;
            }
            Err(e) => {
                warn!(
                    source = self.fetcher.source_id(),
                    error = %e,
                    "Fetch failed; skipping cycle"
                );
            }
        }
    }

    /// Run forever. Never returns under normal operation.
    pub async fn run(self) {
        info!(
            source = self.fetcher.source_id(),
            period_secs = self.period.as_secs_f64(),
            subscribers = self.bus.len(),
            "Starting poll scheduler"
        );

        let first_tick = Instant::now() + self.startup_delay + self.period;
        let mut ticker = time::interval_at(first_tick, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FetchError, ObserverError};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct FlakyFetcher {
        calls: Arc<Mutex<Vec<Instant>>>,
        fail_on: usize,
    }

    #[async_trait]
    impl Fetcher for FlakyFetcher {
        type Output = u32;

        async fn fetch(&self) -> Result<u32, FetchError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Instant::now());
            let cycle = calls.len();
            if cycle == self.fail_on {
                Err(FetchError::Status(500))
            } else {
                Ok(cycle as u32)
            }
        }

        fn source_id(&self) -> &str {
            "flaky"
        }
    }

    struct Collector {
        seen: Arc<Mutex<Vec<u32>>>,
    }

    #[async_trait]
    impl Subscriber<u32> for Collector {
        async fn on_data(&self, _source: &str, data: u32) -> Result<(), ObserverError> {
            self.seen.lock().unwrap().push(data);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cycle_does_not_shift_schedule() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut scheduler = PollScheduler::new(
            FlakyFetcher {
                calls: Arc::clone(&calls),
                fail_on: 2,
            },
            Duration::from_secs(10),
        );
        scheduler.subscribe(Arc::new(Collector {
            seen: Arc::clone(&seen),
        }));

        let start = Instant::now();
        let handle = tokio::spawn(scheduler.run());
        time::sleep(Duration::from_secs(35)).await;
        handle.abort();

        let offsets: Vec<Duration> = calls.lock().unwrap().iter().map(|t| *t - start).collect();
        assert_eq!(
            offsets,
            vec![
                Duration::from_secs(10),
                Duration::from_secs(20),
                Duration::from_secs(30),
            ]
        );

        // Cycle 2 failed, so only cycles 1 and 3 were published.
        assert_eq!(*seen.lock().unwrap(), vec![1, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_delay_offsets_first_cycle_only() {
        let calls = Arc::new(Mutex::new(Vec::new()));

        let scheduler = PollScheduler::new(
            FlakyFetcher {
                calls: Arc::clone(&calls),
                fail_on: usize::MAX,
            },
            Duration::from_secs(10),
        )
        .with_startup_delay(Duration::from_secs(3));

        let start = Instant::now();
        let handle = tokio::spawn(scheduler.run());
        time::sleep(Duration::from_secs(25)).await;
        handle.abort();

        let offsets: Vec<Duration> = calls.lock().unwrap().iter().map(|t| *t - start).collect();
        assert_eq!(
            offsets,
            vec![Duration::from_secs(13), Duration::from_secs(23)]
        );
    }
}
