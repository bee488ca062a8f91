//! Shared error type across podprobe crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Configuration rejected at startup.
    InvalidConfig,
    /// Listener could not be bound.
    BindFailed,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidConfig => "INVALID_CONFIG",
            ClientCode::BindFailed => "BIND_FAILED",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PodProbeError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum PodProbeError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("internal: {0}")]
    Internal(String),
}

impl PodProbeError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            PodProbeError::InvalidConfig(_) => ClientCode::InvalidConfig,
            PodProbeError::Bind { .. } => ClientCode::BindFailed,
            PodProbeError::Internal(_) => ClientCode::Internal,
        }
    }
}
