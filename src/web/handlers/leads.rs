//! Lead listing for operators.
//!
//! Unauthenticated: anyone who can reach the server can read every lead.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::submission::FieldError;
use crate::web::config::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use crate::web::state::SharedState;
use crate::web::utils::{api_error, field_errors};

#[derive(Deserialize)]
pub struct ListLeadsQuery {
    limit: Option<i64>,
}

/// GET /api/leads - Most recent leads, newest first.
pub async fn list_leads_handler(
    State(state): State<SharedState>,
    Query(params): Query<ListLeadsQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if limit < 1 {
        return field_errors(&[FieldError {
            field: "limit",
            reason: "must be a positive integer",
        }]);
    }
    let limit = limit.min(MAX_LIST_LIMIT) as u32;

    let store = state.store.clone();
    match tokio::task::spawn_blocking(move || store.list_recent(limit)).await {
        Ok(Ok(leads)) => {
            let json = serde_json::json!({
                "count": leads.len(),
                "leads": leads,
            });
            (StatusCode::OK, axum::Json(json)).into_response()
        }
        Ok(Err(e)) => {
            crate::tlog!("leads: listing failed: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
