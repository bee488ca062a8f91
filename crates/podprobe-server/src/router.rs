//! Axum router wiring.
//!
//! Probe routes accept any method; `/metrics` is GET only. Unknown paths get
//! axum's default 404.

use axum::{routing::{any, get}, Router};

use crate::{app_state::AppState, handlers, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(handlers::root))
        .route("/health", any(handlers::health))
        .route("/ready", any(handlers::ready))
        .route("/stats", any(handlers::stats))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
