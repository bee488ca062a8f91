//! Simulated workload latency.

use std::time::Duration;

use rand::Rng;

/// Source of the artificial delay applied by the root endpoint.
pub trait DelaySource: Send + Sync {
    /// Duration in `[min, max)`. Implementations return `min` when the range is empty.
    fn random_delay(&self, min: Duration, max: Duration) -> Duration;
}

/// Uniform millisecond delays from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformDelay;

impl DelaySource for UniformDelay {
    fn random_delay(&self, min: Duration, max: Duration) -> Duration {
        let lo = min.as_millis() as u64;
        let hi = max.as_millis() as u64;
        if hi <= lo {
            return min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(lo..hi))
    }
}

/// Always the same delay, regardless of the requested range.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl DelaySource for FixedDelay {
    fn random_delay(&self, _min: Duration, _max: Duration) -> Duration {
        self.0
    }
}
