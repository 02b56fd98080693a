//! Embedded static assets for the landing page.

use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "static/"]
struct Assets;

fn serve_asset(path: &str) -> Response {
    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

/// GET / - the landing page.
pub async fn index_handler() -> Response {
    serve_asset("index.html")
}

/// GET /static/*path
pub async fn static_handler(Path(path): Path<String>) -> Response {
    serve_asset(path.trim_start_matches('/'))
}
