//! Operational HTTP endpoints.
//!
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;
use crate::obs::metrics::Sample;

pub async fn metrics(State(state): State<AppState>) -> Response {
    let snap = state.counters().snapshot();
    let extra = [
        Sample {
            name: "podprobe_requests_total",
            kind: "counter",
            value: i64::try_from(snap.total).unwrap_or(i64::MAX),
        },
        Sample {
            name: "podprobe_requests_active",
            kind: "gauge",
            value: snap.active,
        },
        Sample {
            name: "podprobe_uptime_seconds",
            kind: "gauge",
            value: state.uptime_secs(),
        },
        Sample {
            name: "podprobe_ready",
            kind: "gauge",
            value: i64::from(state.readiness().is_ready()),
        },
    ];
    let body = state.metrics().render(&extra);

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
