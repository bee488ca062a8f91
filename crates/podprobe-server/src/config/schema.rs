use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use chrono::TimeDelta;
use podprobe_core::error::{PodProbeError, Result};
use podprobe_core::readiness::DEFAULT_WARMUP_MS;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default = "default_app_version")]
    pub app_version: String,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub workload: WorkloadSection,

    #[serde(default)]
    pub probes: ProbeSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            app_version: default_app_version(),
            server: ServerSection::default(),
            workload: WorkloadSection::default(),
            probes: ProbeSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.app_version.trim().is_empty() {
            return Err(PodProbeError::InvalidConfig("app_version must not be empty".into()));
        }

        self.server.validate()?;
        self.workload.validate()?;
        self.probes.validate()?;

        Ok(())
    }

    /// Apply `APP_VERSION` / `PORT` overrides. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("APP_VERSION") {
            self.app_version = v;
        }
        if let Some(v) = get("PORT") {
            self.server.port = v.trim().parse().map_err(|e| {
                PodProbeError::InvalidConfig(format!("PORT must be a TCP port, got {v:?}: {e}"))
            })?;
        }

        self.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(PodProbeError::InvalidConfig("server.port must not be 0".into()));
        }
        self.host.parse::<IpAddr>().map_err(|e| {
            PodProbeError::InvalidConfig(format!("server.host must be an IP address: {e}"))
        })?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|e| {
            PodProbeError::InvalidConfig(format!("server.host must be an IP address: {e}"))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadSection {
    #[serde(default = "default_delay_min_ms")]
    pub delay_min_ms: u64,

    #[serde(default = "default_delay_max_ms")]
    pub delay_max_ms: u64,
}

impl Default for WorkloadSection {
    fn default() -> Self {
        Self {
            delay_min_ms: default_delay_min_ms(),
            delay_max_ms: default_delay_max_ms(),
        }
    }
}

impl WorkloadSection {
    pub fn validate(&self) -> Result<()> {
        if self.delay_min_ms >= self.delay_max_ms {
            return Err(PodProbeError::InvalidConfig(
                "workload.delay_min_ms must be less than delay_max_ms".into(),
            ));
        }
        if self.delay_max_ms > 60_000 {
            return Err(PodProbeError::InvalidConfig(
                "workload.delay_max_ms must be at most 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn delay_min(&self) -> Duration {
        Duration::from_millis(self.delay_min_ms)
    }

    pub fn delay_max(&self) -> Duration {
        Duration::from_millis(self.delay_max_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    #[serde(default = "default_warmup_ms")]
    pub warmup_ms: u64,
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            warmup_ms: default_warmup_ms(),
        }
    }
}

impl ProbeSection {
    pub fn validate(&self) -> Result<()> {
        if self.warmup_ms > 600_000 {
            return Err(PodProbeError::InvalidConfig(
                "probes.warmup_ms must be at most 600000".into(),
            ));
        }
        Ok(())
    }

    pub fn warmup(&self) -> TimeDelta {
        // bounded by validate()
        TimeDelta::milliseconds(self.warmup_ms as i64)
    }
}

fn default_app_version() -> String {
    "1.0.0".into()
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_delay_min_ms() -> u64 {
    1000
}
fn default_delay_max_ms() -> u64 {
    5000
}
fn default_warmup_ms() -> u64 {
    DEFAULT_WARMUP_MS
}
