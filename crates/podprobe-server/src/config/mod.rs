//! Service config loader (strict parsing, environment overrides).

pub mod schema;

use std::fs;

use podprobe_core::error::{PodProbeError, Result};

pub use schema::{ProbeSection, ServerSection, ServiceConfig, WorkloadSection};

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "PODPROBE_CONFIG";

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PodProbeError::InvalidConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| PodProbeError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Defaults, then the optional file, then `APP_VERSION` / `PORT`.
pub fn load_from_env() -> Result<ServiceConfig> {
    let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => load_from_file(&path)?,
        _ => ServiceConfig::default(),
    };
    cfg.apply_env(|key| std::env::var(key).ok())?;
    Ok(cfg)
}
