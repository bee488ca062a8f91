//! Warm-up based readiness.
//!
//! There is no stored state machine: readiness is recomputed from elapsed
//! time on every probe, and once the threshold is reached it stays reached
//! for as long as the clock moves forward.

use chrono::{DateTime, TimeDelta, Utc};

use crate::clock::elapsed;

/// Default warm-up period, in milliseconds, before the service reports ready.
pub const DEFAULT_WARMUP_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    WarmingUp,
    Ready,
}

impl Readiness {
    /// Ready once `now - start >= warmup` (the threshold itself counts as ready).
    pub fn evaluate(start: DateTime<Utc>, now: DateTime<Utc>, warmup: TimeDelta) -> Self {
        if elapsed(start, now) < warmup {
            Readiness::WarmingUp
        } else {
            Readiness::Ready
        }
    }

    pub fn is_ready(self) -> bool {
        matches!(self, Readiness::Ready)
    }
}
