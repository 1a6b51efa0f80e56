//! Page routes
//!
//! `GET /` returns the explorer page (analyze button, result panel, optional
//! classifier token field) and `GET /static/app.js` its script. Both are
//! compiled into the binary and served with `Cache-Control: no-cache`.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const APP_JS: &str = include_str!("../ui/app.js");

/// GET /
pub async fn serve_index() -> Response {
    embedded(INDEX_HTML, "text/html; charset=utf-8")
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    embedded(APP_JS, "application/javascript")
}

fn embedded(body: &'static str, content_type: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}
