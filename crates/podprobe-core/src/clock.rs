//! Time source and uptime formatting.
//!
//! Handlers never call `Utc::now()` directly; they go through a [`Clock`] so
//! uptime and readiness can be driven deterministically in tests.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};

/// Wall-clock source.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    base: DateTime<Utc>,
    offset_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(base: DateTime<Utc>) -> Self {
        Self {
            base,
            offset_ms: AtomicI64::new(0),
        }
    }

    /// Move the clock forward by `ms` milliseconds.
    pub fn advance_ms(&self, ms: i64) {
        self.offset_ms.fetch_add(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.base + TimeDelta::milliseconds(self.offset_ms.load(Ordering::Relaxed))
    }
}

/// Elapsed time between `start` and `now`, clamped at zero when the clock
/// stepped backwards.
pub fn elapsed(start: DateTime<Utc>, now: DateTime<Utc>) -> TimeDelta {
    (now - start).max(TimeDelta::zero())
}

/// Render a duration rounded to whole seconds as `1h2m3s`, `4m0s`, `7s`.
/// Half a second rounds up; zero renders as `0s`.
pub fn format_uptime(d: TimeDelta) -> String {
    let ms = d.num_milliseconds().max(0);
    let total = (ms + 500) / 1000;

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
