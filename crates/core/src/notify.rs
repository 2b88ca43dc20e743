//! Notification payloads handed to the delivery sink.

use crate::PriceReport;
use serde::{Deserialize, Serialize};

/// How the sink should deliver a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Text,
    Sticker,
    Photo,
}

/// A notification decision made by the digest logic.
///
/// At most one event is emitted per price cycle; an all-time high and the
/// daily digest never fire together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlertEvent {
    /// The price set a new all-time high this cycle.
    AllTimeHigh(PriceReport),
    /// The scheduled daily digest is due.
    DailyDigest(PriceReport),
}

impl AlertEvent {
    /// The report this event carries.
    pub fn report(&self) -> &PriceReport {
        match self {
            AlertEvent::AllTimeHigh(r) | AlertEvent::DailyDigest(r) => r,
        }
    }
}

/// Opaque delivery targets; the core never interprets them.
pub type RecipientSet = Vec<String>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AthRecord, PriceSnapshot};

    #[test]
    fn test_event_exposes_report() {
        let report = PriceReport {
            price: PriceSnapshot {
                usd: 3.5,
                ..Default::default()
            },
            tvl: None,
            previous_ath: AthRecord::new(1_600_000_000, 2.93),
            is_ath: true,
        };
        let event = AlertEvent::AllTimeHigh(report.clone());
        assert_eq!(event.report(), &report);
    }
}
