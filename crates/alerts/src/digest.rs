//! ATH-versus-daily-digest decision logic.

use crate::{AthTracker, DailyGate, NotificationSink, SinkError, TvlKeeper};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, NaiveTime};
use pulse_core::{AlertEvent, AthRecord, MessageKind, PriceReport, PriceSnapshot, RecipientSet};
use pulse_feeds::{ObserverError, Subscriber};
use pulse_store::StoreError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

/// When the daily digest becomes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestSchedule {
    pub hour: u32,
    pub minute: u32,
}

impl DigestSchedule {
    /// Due once the local clock passes (hour, minute); the daily gate keeps
    /// it to once per calendar day.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        match NaiveTime::from_hms_opt(self.hour, self.minute, 0) {
            Some(due) => now.time() >= due,
            None => false,
        }
    }
}

/// Decides, once per successful price cycle, whether to emit an
/// all-time-high alert, the scheduled daily digest, or nothing.
///
/// An ATH bypasses both the schedule and the gate; the two events are
/// mutually exclusive within one cycle so a high landing inside the digest
/// window cannot double-notify.
pub struct DigestEngine {
    ath: AthTracker,
    gate: DailyGate,
    schedule: DigestSchedule,
    tvl: Arc<TvlKeeper>,
    sink: Arc<dyn NotificationSink>,
    recipients: RecipientSet,
}

impl DigestEngine {
    pub fn new(
        ath: AthTracker,
        gate: DailyGate,
        schedule: DigestSchedule,
        tvl: Arc<TvlKeeper>,
        sink: Arc<dyn NotificationSink>,
        recipients: RecipientSet,
    ) -> Self {
        Self {
            ath,
            gate,
            schedule,
            tvl,
            sink,
            recipients,
        }
    }

    /// One decision pass against the system clock.
    pub async fn on_price(&self, snapshot: &PriceSnapshot) -> Result<Option<AlertEvent>, DigestError> {
        self.on_price_at(snapshot, Local::now().naive_local()).await
    }

    /// One decision pass with an explicit clock. `now` is captured once per
    /// cycle: the gate check and the gate write see the same day, so a cycle
    /// straddling midnight cannot double-fire.
    pub async fn on_price_at(
        &self,
        snapshot: &PriceSnapshot,
        now: NaiveDateTime,
    ) -> Result<Option<AlertEvent>, DigestError> {
        let previous_ath = self.ath.previous().await;
        let is_ath = self
            .ath
            .update_if_new_at(snapshot.usd, now.and_utc().timestamp())
            .await?;

        if is_ath {
            let event = AlertEvent::AllTimeHigh(self.report(snapshot, previous_ath, true).await);
            self.sink
                .send(&self.recipients, &event, MessageKind::Text)
                .await?;
            return Ok(Some(event));
        }

        if self.schedule.is_due(now) && self.gate.can_fire_on(now.date()).await {
            let event = AlertEvent::DailyDigest(self.report(snapshot, previous_ath, false).await);
            self.sink
                .send(&self.recipients, &event, MessageKind::Text)
                .await?;
            self.gate.write_day(now.date()).await?;
            return Ok(Some(event));
        }

        Ok(None)
    }

    async fn report(
        &self,
        snapshot: &PriceSnapshot,
        previous_ath: AthRecord,
        is_ath: bool,
    ) -> PriceReport {
        PriceReport {
            price: *snapshot,
            tvl: self.tvl.watched_protocol().await,
            previous_ath,
            is_ath,
        }
    }
}

#[async_trait]
impl Subscriber<PriceSnapshot> for DigestEngine {
    async fn on_data(&self, _source: &str, data: PriceSnapshot) -> Result<(), ObserverError> {
        self.on_price(&data)
            .await
            .map(|_| ())
            .map_err(ObserverError::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use pulse_store::{KeyValueStore, MemoryStore};
    use std::sync::Mutex;

    const BASELINE: AthRecord = AthRecord::new(1_600_000_000, 2.93);

    struct RecordingSink {
        sent: Mutex<Vec<(usize, AlertEvent, MessageKind)>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
            }
        }

        fn events(&self) -> Vec<AlertEvent> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|(_, e, _)| e.clone())
                .collect()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn send(
            &self,
            recipients: &RecipientSet,
            event: &AlertEvent,
            kind: MessageKind,
        ) -> Result<(), SinkError> {
            self.sent
                .lock()
                .unwrap()
                .push((recipients.len(), event.clone(), kind));
            Ok(())
        }
    }

    fn engine() -> (Arc<MemoryStore>, Arc<RecordingSink>, DigestEngine) {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink::new());
        let engine = DigestEngine::new(
            AthTracker::new(store.clone(), "ath:usd", BASELINE),
            DailyGate::new(store.clone(), "digest"),
            DigestSchedule { hour: 10, minute: 0 },
            Arc::new(TvlKeeper::new(store.clone(), "Alpha Homora")),
            sink.clone(),
            vec!["chat-1".to_string()],
        );
        (store, sink, engine)
    }

    fn snapshot(usd: f64) -> PriceSnapshot {
        PriceSnapshot {
            usd,
            ..Default::default()
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 2, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_ath_suppresses_digest_inside_the_window() {
        let (store, sink, engine) = engine();

        // 3.50 beats the 2.93 baseline at a time the digest is also due.
        let event = engine
            .on_price_at(&snapshot(3.5), at(10, 30))
            .await
            .unwrap();

        match event {
            Some(AlertEvent::AllTimeHigh(report)) => {
                assert_eq!(report.price.usd, 3.5);
                assert_eq!(report.previous_ath, BASELINE);
                assert!(report.is_ath);
            }
            other => panic!("expected an ATH event, got {other:?}"),
        }
        assert_eq!(sink.events().len(), 1);

        // The digest gate was never written; only the ATH key was.
        assert_eq!(store.get("once-a-day:digest").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_digest_fires_once_per_day() {
        let (store, sink, engine) = engine();

        // 1.20 is no high; the window is open and the gate permits.
        let event = engine
            .on_price_at(&snapshot(1.2), at(10, 30))
            .await
            .unwrap();
        assert!(matches!(event, Some(AlertEvent::DailyDigest(_))));
        assert_eq!(
            store.get("once-a-day:digest").await.unwrap(),
            Some(b"2021-02-03".to_vec())
        );

        // A later cycle the same day emits nothing.
        let event = engine
            .on_price_at(&snapshot(1.25), at(10, 45))
            .await
            .unwrap();
        assert_eq!(event, None);
        assert_eq!(sink.events().len(), 1);
    }

    #[tokio::test]
    async fn test_nothing_fires_before_the_window() {
        let (_store, sink, engine) = engine();

        let event = engine
            .on_price_at(&snapshot(1.2), at(9, 59))
            .await
            .unwrap();
        assert_eq!(event, None);
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_digest_report_carries_latest_tvl() {
        let (store, sink, engine) = engine();

        let entries = vec![pulse_core::TvlEntry {
            name: "Alpha Homora".to_string(),
            tvl_usd: 1.6e7,
            ..Default::default()
        }];
        store
            .set("tvl:last", &serde_json::to_vec(&entries).unwrap())
            .await
            .unwrap();

        engine
            .on_price_at(&snapshot(1.2), at(10, 30))
            .await
            .unwrap();

        let events = sink.events();
        let report = events[0].report();
        assert_eq!(report.tvl.as_ref().map(|t| t.tvl_usd), Some(1.6e7));
    }

    #[tokio::test]
    async fn test_ath_still_allows_next_day_digest() {
        let (_store, sink, engine) = engine();

        // ATH today, then a regular cycle inside tomorrow's window.
        engine
            .on_price_at(&snapshot(3.5), at(10, 30))
            .await
            .unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2021, 2, 4)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let event = engine
            .on_price_at(&snapshot(1.2), tomorrow)
            .await
            .unwrap();

        assert!(matches!(event, Some(AlertEvent::DailyDigest(_))));
        assert_eq!(sink.events().len(), 2);
    }

    #[test]
    fn test_schedule_is_due() {
        let schedule = DigestSchedule { hour: 12, minute: 45 };
        assert!(!schedule.is_due(at(12, 44)));
        assert!(schedule.is_due(at(12, 45)));
        assert!(schedule.is_due(at(23, 0)));
    }
}
