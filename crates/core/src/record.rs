//! Records the alert engines persist in the key-value store.
//!
//! Every record round-trips through JSON with the store; a missing or
//! corrupt value degrades to the documented default at the read site.

use serde::{Deserialize, Serialize};

/// Rate-limiter state for one event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CooldownRecord {
    /// Unix seconds of the moment the window last closed.
    pub last_fired: i64,
    /// Uses spent inside the current window.
    pub count: u32,
}

impl CooldownRecord {
    /// True when the cooldown window has elapsed (or never opened).
    pub fn can_fire(&self, now: i64, cooldown_secs: i64) -> bool {
        now - self.last_fired > cooldown_secs
    }

    /// Spend one use. The closing use (the `max_times`-th) stamps
    /// `last_fired` and resets the counter to zero.
    pub fn register_use(&mut self, now: i64, max_times: u32) {
        self.count += 1;
        if self.count >= max_times {
            self.last_fired = now;
            self.count = 0;
        }
    }
}

/// All-time-high record: the highest value seen and when it was seen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AthRecord {
    /// Unix seconds of the high.
    pub timestamp: i64,
    /// The high itself.
    pub value: f64,
}

impl AthRecord {
    pub const fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Strictly-greater comparison; zero and negative candidates never
    /// qualify.
    pub fn is_new_high(&self, candidate: f64) -> bool {
        candidate > 0.0 && candidate > self.value
    }
}
