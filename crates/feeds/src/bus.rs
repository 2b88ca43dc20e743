//! Fan-out of fetch results to registered subscribers.

use crate::ObserverError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::error;

/// Receives each successful fetch result from one source.
#[async_trait]
pub trait Subscriber<T>: Send + Sync {
    /// Handle one payload. Errors are isolated at the bus boundary.
    async fn on_data(&self, source: &str, data: T) -> Result<(), ObserverError>;
}

/// Ordered fan-out for one fetcher's results.
///
/// Subscribers are registered once at startup; there is no runtime
/// add/remove.
pub struct SubscriptionBus<T> {
    subscribers: Vec<Arc<dyn Subscriber<T>>>,
}

impl<T: Clone + Send + Sync + 'static> SubscriptionBus<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register a subscriber. Delivery order is registration order.
    pub fn subscribe(&mut self, subscriber: Arc<dyn Subscriber<T>>) {
        self.subscribers.push(subscriber);
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver `data` to every subscriber in order. Each subscriber gets its
    /// own clone; one subscriber's failure never blocks the rest.
    pub async fn publish(&self, source: &str, data: &T) {
        for subscriber in &self.subscribers {
            if let Err(e) = subscriber.on_data(source, data.clone()).await {
                error!(source, error = %e, "Subscriber failed; continuing delivery");
            }
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for SubscriptionBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct Recorder {
        label: &'static str,
        seen: Arc<Mutex<Vec<(&'static str, u32)>>>,
        fail: bool,
    }

    #[async_trait]
    impl Subscriber<u32> for Recorder {
        async fn on_data(&self, _source: &str, data: u32) -> Result<(), ObserverError> {
            self.seen.lock().unwrap().push((self.label, data));
            if self.fail {
                return Err(ObserverError::new("handler exploded"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failing_subscriber_does_not_starve_the_next() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = SubscriptionBus::new();
        bus.subscribe(Arc::new(Recorder {
            label: "first",
            seen: Arc::clone(&seen),
            fail: true,
        }));
        bus.subscribe(Arc::new(Recorder {
            label: "second",
            seen: Arc::clone(&seen),
            fail: false,
        }));

        bus.publish("test", &7).await;

        // Both saw the payload exactly once, in registration order.
        assert_eq!(*seen.lock().unwrap(), vec![("first", 7), ("second", 7)]);
    }

    #[tokio::test]
    async fn test_publish_with_no_subscribers_is_a_no_op() {
        let bus: SubscriptionBus<u32> = SubscriptionBus::new();
        assert!(bus.is_empty());
        bus.publish("test", &1).await;
    }
}
