//! In-process observability.
//!
//! Request counts per endpoint and root delay distribution, stored as atomics
//! and rendered by the `/metrics` handler.

pub mod metrics;
