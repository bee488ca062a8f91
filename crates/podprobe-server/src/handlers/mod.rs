//! Probe and workload HTTP handlers.
//!
//! - `/`       : simulated workload with a random delay
//! - `/health` : liveness, always 200
//! - `/ready`  : readiness, 503 until the warm-up period has passed
//! - `/stats`  : counter snapshot

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;

use podprobe_core::error::PodProbeError;
use podprobe_core::host::container_id;
use podprobe_core::metrics::InFlightGuard;

use crate::app_state::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub version: String,
    pub hostname: String,
    pub container_id: String,
    pub timestamp: DateTime<Utc>,
    pub uptime: String,
    pub total_requests: u64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub version: String,
    pub hostname: String,
    pub uptime: String,
    pub total_requests: u64,
    pub active_requests: i64,
    pub started_at: String,
}

fn record_hit(state: &AppState, path: &'static str) {
    state.metrics().http_requests.inc(&[("path", path)]);
}

/// Root endpoint. The workload runs on its own task: if the client goes away
/// the handler future is dropped but the delay still runs to completion.
pub async fn root(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Json<RootResponse>, ApiError> {
    record_hit(&state, "/");
    let guard = state.counters().enter();

    let task = tokio::spawn(simulate_workload(state, guard, method, uri.path().to_string()));
    let resp = task
        .await
        .map_err(|e| PodProbeError::Internal(format!("workload task failed: {e}")))?;

    Ok(Json(resp))
}

async fn simulate_workload(
    state: AppState,
    _guard: InFlightGuard,
    method: Method,
    path: String,
) -> RootResponse {
    let seq = state.counters().increment_total();

    let workload = &state.cfg().workload;
    let delay = state
        .delay_source()
        .random_delay(workload.delay_min(), workload.delay_max());
    tokio::time::sleep(delay).await;
    state.metrics().root_delay.observe(&[], delay);

    let hostname = state.hostname();
    let cid = container_id(&hostname).to_string();
    let delay_ms = delay.as_millis();
    let version = state.version().to_string();

    tracing::info!(
        container_id = %cid,
        %method,
        path = %path,
        request = seq,
        delay_ms = delay_ms as u64,
        "request served"
    );

    RootResponse {
        message: format!("Hello from container {cid} (version {version}) - delayed {delay_ms}ms"),
        version,
        timestamp: state.now(),
        uptime: state.uptime(),
        total_requests: seq,
        hostname,
        container_id: cid,
    }
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    record_hit(&state, "/health");
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "version": state.version(),
        })),
    )
}

pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    record_hit(&state, "/ready");
    if state.readiness().is_ready() {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not ready", "reason": "warming up" })),
        )
    }
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    record_hit(&state, "/stats");
    let snap = state.counters().snapshot();

    Json(StatsResponse {
        version: state.version().to_string(),
        hostname: state.hostname(),
        uptime: state.uptime(),
        total_requests: snap.total,
        active_requests: snap.active,
        started_at: snap.start.to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}
