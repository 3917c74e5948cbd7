use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "static/"]
struct DashboardAssets;

/// Serve embedded dashboard assets. Unknown non-API paths fall back to
/// `index.html`; unknown `/api/` paths are a JSON 404.
pub async fn static_handler(uri: axum::http::Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    if path.starts_with("api/") {
        let body = serde_json::json!({ "error": format!("no such endpoint: /{path}") });
        return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
    }

    if let Some(content) = <DashboardAssets as Embed>::get(path) {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime.as_ref())],
            content.data.to_vec(),
        )
            .into_response();
    }

    match <DashboardAssets as Embed>::get("index.html") {
        Some(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html")],
            content.data.to_vec(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "dashboard not embedded").into_response(),
    }
}
