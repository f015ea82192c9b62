use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/live", get(live))
        .route("/info", get(info))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
struct HealthInfoResponse {
    service: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

async fn root(State(state): State<AppState>) -> Response {
    let ok = state.storage().ping().await.is_ok();

    let response = HealthResponse {
        status: if ok { "ok" } else { "degraded" },
        database: if ok { "connected" } else { "disconnected" },
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let status_code = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response)).into_response()
}

async fn live() -> Response {
    Json(serde_json::json!({ "status": "ok" })).into_response()
}

async fn info(State(state): State<AppState>) -> Response {
    Json(HealthInfoResponse {
        service: "vocabook-backend",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
    })
    .into_response()
}
