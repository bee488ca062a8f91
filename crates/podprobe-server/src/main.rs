//! podprobe server
//!
//! Demo service for container orchestration probes:
//! - `/` simulated workload (1-5 s random delay)
//! - `/health` liveness, `/ready` readiness after warm-up
//! - `/stats` request counters, `/metrics` Prometheus text

use tracing_subscriber::{fmt, EnvFilter};

use podprobe_core::error::{PodProbeError, Result};
use podprobe_server::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, code = e.client_code().as_str(), "podprobe-server exiting");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_from_env()?;
    let listen = cfg.server.listen_addr()?;
    let port = cfg.server.port;

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state.clone());

    tracing::info!(version = %state.version(), "podprobe-server starting");
    tracing::info!(container = %state.hostname(), %listen, "listening");
    tracing::info!("health check: http://localhost:{port}/health");
    tracing::info!("stats: http://localhost:{port}/stats");

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|source| PodProbeError::Bind { addr: listen.to_string(), source })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| PodProbeError::Internal(format!("server failed: {e}")))
}
