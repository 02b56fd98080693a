//! Axum router construction.

use axum::routing::{get, post};
use axum::Router;

use crate::web::handlers;
use crate::web::state::SharedState;
use crate::web::static_files::{index_handler, static_handler};

/// Build the complete Axum router with all API routes and static file serving.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/contact",
            post(handlers::contact::submit_contact_handler),
        )
        .route("/api/leads", get(handlers::leads::list_leads_handler))
        // Static assets
        .route("/", get(index_handler))
        .route("/static/*path", get(static_handler))
        .with_state(state)
}
