//! HTTP mapping for [`PodProbeError`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use podprobe_core::error::PodProbeError;

/// Handler error rendered as `{"error": {"code", "msg"}}`.
#[derive(Debug)]
pub struct ApiError(pub PodProbeError);

impl From<PodProbeError> for ApiError {
    fn from(e: PodProbeError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        let body = json!({
            "error": {
                "code": self.0.client_code().as_str(),
                "msg": self.0.to_string(),
            }
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
