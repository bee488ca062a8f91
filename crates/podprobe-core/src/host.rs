//! Hostname lookup and container identifier derivation.

use std::io;

/// Number of leading characters kept for the display container id.
pub const CONTAINER_ID_LEN: usize = 12;

/// Hostname used when the lookup fails.
pub const UNKNOWN_HOST: &str = "unknown";

/// Source of the local hostname.
pub trait HostnameSource: Send + Sync {
    fn hostname(&self) -> io::Result<String>;
}

/// Reads the kernel hostname.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHostname;

impl HostnameSource for SystemHostname {
    fn hostname(&self) -> io::Result<String> {
        let raw = gethostname::gethostname();
        let name = raw
            .into_string()
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "hostname is not valid UTF-8"))?;
        if name.is_empty() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "hostname is empty"));
        }
        Ok(name)
    }
}

/// Fixed hostname, or a lookup that always fails when `None`.
#[derive(Debug, Clone)]
pub struct StaticHostname(pub Option<String>);

impl HostnameSource for StaticHostname {
    fn hostname(&self) -> io::Result<String> {
        self.0
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no hostname configured"))
    }
}

/// Resolve the hostname, substituting [`UNKNOWN_HOST`] on failure.
pub fn resolve_hostname(src: &dyn HostnameSource) -> String {
    match src.hostname() {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!(error = %e, "hostname lookup failed");
            UNKNOWN_HOST.to_string()
        }
    }
}

/// First [`CONTAINER_ID_LEN`] characters of `hostname`, or all of it when shorter.
pub fn container_id(hostname: &str) -> &str {
    match hostname.char_indices().nth(CONTAINER_ID_LEN) {
        Some((idx, _)) => &hostname[..idx],
        None => hostname,
    }
}
