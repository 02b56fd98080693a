//! Contact-form submission endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::submission::SubmissionError;
use crate::web::state::SharedState;
use crate::web::utils::field_errors;

pub const ACKNOWLEDGEMENT: &str = "Thank you — your message has been received.";

/// POST /api/contact - Validate a submission and acknowledge it.
///
/// Storage and email run in the background; their outcome never changes
/// this response.
pub async fn submit_contact_handler(State(state): State<SharedState>, body: Bytes) -> Response {
    match state.pipeline.submit(&body) {
        Ok(_dispatched) => {
            let json = serde_json::json!({
                "status": "success",
                "message": ACKNOWLEDGEMENT,
            });
            (StatusCode::OK, axum::Json(json)).into_response()
        }
        Err(SubmissionError::Invalid(errors)) => field_errors(&errors),
        Err(SubmissionError::Decode(e)) => {
            crate::tlog!("contact: rejected malformed body: {}", e);
            let json = serde_json::json!({ "detail": "Invalid request" });
            (StatusCode::BAD_REQUEST, axum::Json(json)).into_response()
        }
    }
}
