//! Shared application state for the podprobe server.
//!
//! Everything a handler touches is reachable from here: the config, the
//! request counters, the metrics registry, and the injected clock / delay /
//! hostname sources. Nothing lives in a global.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use podprobe_core::clock::{elapsed, format_uptime, Clock, SystemClock};
use podprobe_core::host::{resolve_hostname, HostnameSource, SystemHostname};
use podprobe_core::metrics::MetricsState;
use podprobe_core::readiness::Readiness;
use podprobe_core::workload::{DelaySource, UniformDelay};

use crate::config::ServiceConfig;
use crate::obs::metrics::ServiceMetrics;

/// External collaborators the handlers depend on.
#[derive(Clone)]
pub struct Sources {
    pub clock: Arc<dyn Clock>,
    pub delay: Arc<dyn DelaySource>,
    pub hostname: Arc<dyn HostnameSource>,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            delay: Arc::new(UniformDelay),
            hostname: Arc::new(SystemHostname),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    counters: Arc<MetricsState>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    sources: Sources,
    metrics: ServiceMetrics,
}

impl AppState {
    /// Build state with the system clock, thread RNG delays, and kernel hostname.
    pub fn new(cfg: ServiceConfig) -> Self {
        Self::with_sources(cfg, Sources::default())
    }

    /// Build state around explicit sources. The start time is read from the
    /// clock here, once.
    pub fn with_sources(cfg: ServiceConfig, sources: Sources) -> Self {
        let counters = Arc::new(MetricsState::new(sources.clock.now()));
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                sources,
                metrics: ServiceMetrics::default(),
            }),
            counters,
        }
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn version(&self) -> &str {
        &self.inner.cfg.app_version
    }

    pub fn counters(&self) -> &Arc<MetricsState> {
        &self.counters
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.inner.metrics
    }

    pub fn delay_source(&self) -> &dyn DelaySource {
        self.inner.sources.delay.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.inner.sources.clock.now()
    }

    pub fn hostname(&self) -> String {
        resolve_hostname(self.inner.sources.hostname.as_ref())
    }

    pub fn uptime(&self) -> String {
        format_uptime(elapsed(self.counters.start_time(), self.now()))
    }

    pub fn uptime_secs(&self) -> i64 {
        elapsed(self.counters.start_time(), self.now()).num_seconds()
    }

    pub fn readiness(&self) -> Readiness {
        Readiness::evaluate(
            self.counters.start_time(),
            self.now(),
            self.inner.cfg.probes.warmup(),
        )
    }
}
