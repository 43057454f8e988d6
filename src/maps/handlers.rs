use axum::{
    extract::State,
    http::{header::HOST, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::maps::cards::{build_cards, needs_fallback_images, CardDeck};
use crate::pages::handlers::RENDER_ERROR_BODY;

/// Template rendering the card list and slideshow markup.
pub const MAP_CARDS_TEMPLATE: &str = "map-cards";

/// `GET /maps/cards`: server-rendered map cards.
pub async fn map_cards(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = request_id(&headers);

    let deck = match &state.maps {
        Some(client) => {
            let maps = client.list_maps().await;
            let images = if needs_fallback_images(&maps) {
                client.list_images().await
            } else {
                Vec::new()
            };
            build_cards(&maps, &images)
        }
        None => CardDeck::default(),
    };

    let deck = match headers.get(HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => deck.with_play_urls(host, "/"),
        None => deck,
    };

    match state.pages.composer().render(MAP_CARDS_TEMPLATE, &deck).await {
        Ok(html) => {
            tracing::debug!(request_id = %request_id, cards = deck.cards.len(), "Map cards rendered");
            Html(html).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Error rendering map cards");
            (StatusCode::INTERNAL_SERVER_ERROR, RENDER_ERROR_BODY).into_response()
        }
    }
}
