//! Router-level tests against fake clock, delay, and hostname sources.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use podprobe_core::clock::ManualClock;
use podprobe_core::host::StaticHostname;
use podprobe_core::workload::{DelaySource, FixedDelay};
use podprobe_server::app_state::{AppState, Sources};
use podprobe_server::config::ServiceConfig;
use podprobe_server::router::build_router;

struct Harness {
    state: AppState,
    app: Router,
    clock: Arc<ManualClock>,
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn harness_with(delay: Arc<dyn DelaySource>, hostname: Option<&str>) -> Harness {
    let mut cfg = ServiceConfig::default();
    cfg.app_version = "2.3.4".into();

    let clock = Arc::new(ManualClock::new(base_time()));
    let sources = Sources {
        clock: clock.clone(),
        delay,
        hostname: Arc::new(StaticHostname(hostname.map(str::to_string))),
    };
    let state = AppState::with_sources(cfg, sources);
    let app = build_router(state.clone());
    Harness { state, app, clock }
}

fn harness() -> Harness {
    harness_with(Arc::new(FixedDelay(Duration::from_millis(5))), Some("abcdefghijklmnop"))
}

async fn call(app: &Router, method: Method, path: &str) -> (StatusCode, String) {
    let req = Request::builder().method(method).uri(path).body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn call_json(app: &Router, path: &str) -> (StatusCode, Value) {
    let (status, body) = call(app, Method::GET, path).await;
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn health_always_reports_version() {
    let h = harness();

    for method in [Method::GET, Method::POST, Method::HEAD] {
        let (status, _) = call(&h.app, method, "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call_json(&h.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "2.3.4");
}

#[tokio::test]
async fn ready_flips_after_warmup() {
    let h = harness();

    let (status, body) = call_json(&h.app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "not ready");
    assert_eq!(body["reason"], "warming up");

    h.clock.advance_ms(4_999);
    let (status, _) = call_json(&h.app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // threshold is inclusive
    h.clock.advance_ms(1);
    let (status, body) = call_json(&h.app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": "ready" }));
}

#[tokio::test]
async fn root_builds_payload() {
    let h = harness();
    h.clock.advance_ms(65_000);

    let (status, body) = call_json(&h.app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "2.3.4");
    assert_eq!(body["hostname"], "abcdefghijklmnop");
    assert_eq!(body["container_id"], "abcdefghijkl");
    assert_eq!(body["uptime"], "1m5s");
    assert_eq!(body["total_requests"], 1);
    assert_eq!(
        body["message"],
        "Hello from container abcdefghijkl (version 2.3.4) - delayed 5ms"
    );

    let ts: DateTime<Utc> = body["timestamp"].as_str().unwrap().parse().unwrap();
    assert_eq!(ts, base_time() + chrono::TimeDelta::seconds(65));
}

#[tokio::test]
async fn root_uses_full_short_hostname_and_unknown_fallback() {
    let h = harness_with(Arc::new(FixedDelay(Duration::ZERO)), Some("short"));
    let (_, body) = call_json(&h.app, "/").await;
    assert_eq!(body["container_id"], "short");

    let h = harness_with(Arc::new(FixedDelay(Duration::ZERO)), None);
    let (_, body) = call_json(&h.app, "/").await;
    assert_eq!(body["hostname"], "unknown");
    assert_eq!(body["container_id"], "unknown");
}

// Paused time: the runtime only advances the clock once every task is
// parked, so all workloads are mid-delay when the 200 ms sleep returns.
#[tokio::test(start_paused = true)]
async fn concurrent_root_calls_count_exactly_and_release_slots() {
    let h = harness_with(Arc::new(FixedDelay(Duration::from_millis(500))), Some("pod"));
    const N: usize = 16;

    let calls: Vec<_> = (0..N)
        .map(|_| {
            let app = h.app.clone();
            tokio::spawn(async move { call_json(&app, "/").await })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(h.state.counters().active(), N as i64);

    let results = futures_util::future::join_all(calls).await;

    let mut seqs = HashSet::new();
    for r in results {
        let (status, body) = r.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(seqs.insert(body["total_requests"].as_u64().unwrap()));
    }

    assert_eq!(seqs.len(), N);
    assert_eq!(h.state.counters().total(), N as u64);
    assert_eq!(h.state.counters().active(), 0);
}

#[tokio::test]
async fn stats_counts_only_root_calls() {
    let h = harness();

    call(&h.app, Method::GET, "/health").await;
    call(&h.app, Method::GET, "/ready").await;
    call(&h.app, Method::GET, "/").await;
    call(&h.app, Method::POST, "/").await;
    call(&h.app, Method::GET, "/stats").await;
    h.clock.advance_ms(3_723_000);

    let (status, body) = call_json(&h.app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "2.3.4");
    assert_eq!(body["hostname"], "abcdefghijklmnop");
    assert_eq!(body["total_requests"], 2);
    assert_eq!(body["active_requests"], 0);
    assert_eq!(body["uptime"], "1h2m3s");
    assert_eq!(body["started_at"], "2024-05-01T12:00:00Z");
}

#[tokio::test(start_paused = true)]
async fn client_disconnect_does_not_cancel_workload() {
    let h = harness_with(Arc::new(FixedDelay(Duration::from_millis(400))), Some("pod"));

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let dropped = tokio::time::timeout(Duration::from_millis(100), h.app.clone().oneshot(req)).await;
    assert!(dropped.is_err(), "request should still be sleeping");

    assert_eq!(h.state.counters().total(), 1);
    assert_eq!(h.state.counters().active(), 1);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(h.state.counters().total(), 1);
    assert_eq!(h.state.counters().active(), 0);
    assert_eq!(h.state.metrics().root_delay.count(&[]), 1);
}

struct PanickingDelay;

impl DelaySource for PanickingDelay {
    fn random_delay(&self, _min: Duration, _max: Duration) -> Duration {
        panic!("delay source failure");
    }
}

#[tokio::test]
async fn workload_panic_returns_500_and_releases_slot() {
    let h = harness_with(Arc::new(PanickingDelay), Some("pod"));

    let (status, body) = call_json(&h.app, "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL");
    assert_eq!(h.state.counters().active(), 0);
}

#[tokio::test]
async fn unknown_path_is_404() {
    let h = harness();
    let (status, _) = call(&h.app, Method::GET, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(h.state.counters().total(), 0);
}

#[tokio::test]
async fn metrics_exposes_counters() {
    let h = harness();
    call(&h.app, Method::GET, "/").await;
    call(&h.app, Method::GET, "/health").await;
    h.clock.advance_ms(6_000);

    let (status, body) = call(&h.app, Method::GET, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("podprobe_http_requests_total{path=\"/\"} 1"), "{body}");
    assert!(body.contains("podprobe_http_requests_total{path=\"/health\"} 1"), "{body}");
    assert!(body.contains("podprobe_root_delay_micros_count{} 1"), "{body}");
    assert!(body.contains("podprobe_requests_total 1"), "{body}");
    assert!(body.contains("podprobe_requests_active 0"), "{body}");
    assert!(body.contains("podprobe_uptime_seconds 6"), "{body}");
    assert!(body.contains("podprobe_ready 1"), "{body}");

    let metrics = h.state.metrics();
    assert_eq!(metrics.http_requests.get(&[("path", "/")]), 1);
    assert_eq!(metrics.http_requests.get(&[("path", "/metrics")]), 0);
    assert_eq!(metrics.root_delay.count(&[]), 1);
}
