//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events from the
//! broker. The connection closes when the shutdown sentinel arrives.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::EventFilter;
use crate::broker::{self, Subscription};
use crate::domain::Event;
use crate::service::Publisher;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the broker subscription to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut subscription: Subscription,
    publisher: Arc<Publisher>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut filter = EventFilter::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut filter, &publisher);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            message = subscription.recv() => {
                match message {
                    broker::Message::Payload(payload) => {
                        let Ok(event) = broker::decode(&payload) else {
                            tracing::debug!("ws skipping malformed payload");
                            continue;
                        };
                        if !filter.matches(&event) {
                            continue;
                        }
                        if let Some(json) = event_message(&event).to_json()
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    broker::Message::Shutdown => {
                        let notice = WsMessage::new(
                            String::new(),
                            WsMessageType::Shutdown,
                            serde_json::json!({ "reason": "event source exhausted" }),
                        );
                        if let Some(json) = notice.to_json() {
                            let _ = ws_tx.send(Message::text(json)).await;
                        }
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                    broker::Message::Lagged(n) => {
                        tracing::warn!(lagged = n, "ws client lagged behind broker");
                    }
                    broker::Message::Closed => break,
                }
            }
        }
    }

    subscription.unsubscribe();
    tracing::debug!("ws connection closed");
}

fn event_message(event: &Event) -> WsMessage {
    WsMessage::new(
        event.id.to_string(),
        WsMessageType::Event,
        serde_json::to_value(event).unwrap_or_default(),
    )
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, filter: &mut EventFilter, publisher: &Publisher) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error("", 400, "malformed JSON").to_json();
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 400, "expected a command").to_json();
    }
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return WsMessage::error(msg.id, 404, "unknown command").to_json();
    };

    let payload = match command {
        WsCommand::Subscribe {
            event_types,
            player_ids,
        } => {
            filter.subscribe(&event_types, &player_ids);
            serde_json::json!({
                "subscribed": { "event_types": event_types, "player_ids": player_ids },
                "open": filter.is_open(),
            })
        }
        WsCommand::Unsubscribe {
            event_types,
            player_ids,
        } => {
            filter.unsubscribe(&event_types, &player_ids);
            serde_json::json!({
                "unsubscribed": { "event_types": event_types, "player_ids": player_ids },
                "open": filter.is_open(),
            })
        }
        WsCommand::Reset => {
            filter.clear();
            serde_json::json!({ "open": true })
        }
        WsCommand::GetStats => match publisher.get_stats() {
            Ok(stats) => serde_json::to_value(stats).unwrap_or_default(),
            Err(err) => {
                return WsMessage::error(msg.id, err.status_code().as_u16(), &err.to_string())
                    .to_json();
            }
        },
    };

    WsMessage::new(msg.id, WsMessageType::Response, payload).to_json()
}
