//! Request counters shared by every handler invocation.
//!
//! Counters are plain atomics. They are best-effort telemetry: a
//! [`MetricsSnapshot`] reads each field independently and makes no
//! cross-field consistency promise.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

#[derive(Debug)]
pub struct MetricsState {
    total_requests: AtomicU64,
    active_requests: AtomicI64,
    start_time: DateTime<Utc>,
}

/// Point-in-time read of [`MetricsState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub total: u64,
    pub active: i64,
    pub start: DateTime<Utc>,
}

impl MetricsState {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            active_requests: AtomicI64::new(0),
            start_time,
        }
    }

    /// Bump the total counter and return the post-increment value, used as the
    /// request sequence number.
    pub fn increment_total(&self) -> u64 {
        self.total_requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn increment_active(&self) {
        self.active_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement_active(&self) {
        self.active_requests.fetch_sub(1, Ordering::Relaxed);
    }

    /// Mark a request in flight until the returned guard is dropped.
    pub fn enter(self: &Arc<Self>) -> InFlightGuard {
        self.increment_active();
        InFlightGuard {
            metrics: Arc::clone(self),
        }
    }

    pub fn total(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn active(&self) -> i64 {
        self.active_requests.load(Ordering::Relaxed)
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total: self.total(),
            active: self.active(),
            start: self.start_time,
        }
    }
}

/// Holds one in-flight slot. Releasing happens in `Drop`, so early returns,
/// panics and dropped futures all decrement.
#[derive(Debug)]
pub struct InFlightGuard {
    metrics: Arc<MetricsState>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.metrics.decrement_active();
    }
}
