//! Shared response helpers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::submission::FieldError;

/// Build a standard JSON error response.
pub fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, axum::Json(body)).into_response()
}

/// 422 response listing each failing field.
pub fn field_errors(errors: &[FieldError]) -> Response {
    let body = serde_json::json!({ "detail": errors });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
}
