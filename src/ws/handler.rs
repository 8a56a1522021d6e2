//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws`: Upgrade HTTP connection to a live event feed.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let publisher = std::sync::Arc::clone(&state.publisher);
    let subscription = publisher.broker().subscribe(publisher.channel());

    ws.on_upgrade(move |socket| run_connection(socket, subscription, publisher))
}
