//! podprobe core: request counters, readiness evaluation, and the injectable
//! clock / delay / hostname sources shared by the HTTP server.
//!
//! This crate carries no transport or runtime dependencies so the state and
//! probe logic can be exercised without an HTTP stack.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod clock;
pub mod error;
pub mod host;
pub mod metrics;
pub mod readiness;
pub mod workload;

/// Shared result type.
pub use error::{PodProbeError, Result};
