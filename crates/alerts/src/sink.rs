//! The notification delivery boundary.

use async_trait::async_trait;
use pulse_core::{AlertEvent, MessageKind, RecipientSet};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
#[error("Delivery failed: {0}")]
pub struct SinkError(String);

impl SinkError {
    pub fn new(err: impl std::fmt::Display) -> Self {
        Self(err.to_string())
    }
}

/// Accepts a decided notification. The core chooses when to call this and
/// what data the event carries; rendering and transport live behind it.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(
        &self,
        recipients: &RecipientSet,
        event: &AlertEvent,
        kind: MessageKind,
    ) -> Result<(), SinkError>;
}

/// Sink that only logs. Stands in for the real chat transport, which is an
/// external collaborator.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn send(
        &self,
        recipients: &RecipientSet,
        event: &AlertEvent,
        kind: MessageKind,
    ) -> Result<(), SinkError> {
        let report = event.report();
        match event {
            AlertEvent::AllTimeHigh(_) => info!(
                recipients = recipients.len(),
                kind = ?kind,
                usd = report.price.usd,
                previous = report.previous_ath.value,
                "All-time-high notification"
            ),
            AlertEvent::DailyDigest(_) => info!(
                recipients = recipients.len(),
                kind = ?kind,
                usd = report.price.usd,
                "Daily digest notification"
            ),
        }
        Ok(())
    }
}
