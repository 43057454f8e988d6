use axum::{
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::pages::data::Page;

/// Body sent for any page that fails to render.
pub const RENDER_ERROR_BODY: &str = "Error rendering template";

/// Render one logical page. Failures are logged and answered with a
/// generic 500; no internal detail reaches the client.
pub async fn serve_page(state: AppState, page: Page, headers: HeaderMap) -> Response {
    let request_id = request_id(&headers);

    match state.pages.render(page).await {
        Ok(html) => {
            tracing::debug!(request_id = %request_id, page = %page, bytes = html.len(), "Page rendered");
            Html(html).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, page = %page, error = %e, "Error rendering template");
            (StatusCode::INTERNAL_SERVER_ERROR, RENDER_ERROR_BODY).into_response()
        }
    }
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
