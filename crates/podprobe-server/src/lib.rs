//! podprobe server library entry.
//!
//! Wires config, shared state, probe handlers, and the metrics endpoint into
//! an axum router. Consumed by the binary (`main.rs`) and integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod handlers;
pub mod obs;
pub mod ops;
pub mod router;
