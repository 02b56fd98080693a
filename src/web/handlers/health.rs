//! Health check endpoint.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{SecondsFormat, Utc};

pub async fn health_handler() -> impl IntoResponse {
    let body = serde_json::json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    });
    (StatusCode::OK, axum::Json(body))
}
