//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! applying subscription commands and forwarding filtered events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType, WsRequest};
use super::subscription::SubscriptionManager;
use crate::domain::ParkingEvent;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and applies them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<ParkingEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &mut subs);
                        if let Ok(json) = serde_json::to_string(&reply)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(parking_event) => {
                        if !subs.matches(parking_event.parking_id()) {
                            continue;
                        }
                        let Some(json) = event_frame(&parking_event) else {
                            continue;
                        };
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

fn event_frame(event: &ParkingEvent) -> Option<String> {
    let payload = serde_json::to_value(event).ok()?;
    let msg = WsMessage::new(uuid::Uuid::new_v4().to_string(), WsMessageType::Event, payload);
    serde_json::to_string(&msg).ok()
}

/// Applies a client frame and returns the reply envelope.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> WsMessage {
    let request = match serde_json::from_str::<WsRequest>(text) {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!(error = %err, "rejected ws frame");
            return WsMessage::error("", 400, "malformed or unknown command");
        }
    };

    match request.command {
        WsCommand::Subscribe { parking_ids } => {
            let added = subs.subscribe(&parking_ids);
            WsMessage::new(
                request.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": added,
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        WsCommand::Unsubscribe { parking_ids } => {
            let removed = subs.unsubscribe(&parking_ids);
            WsMessage::new(
                request.id,
                WsMessageType::Response,
                serde_json::json!({
                    "unsubscribed": removed,
                    "remaining_count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_reply_echoes_id_and_counts() {
        let mut subs = SubscriptionManager::new();
        let reply = handle_text_message(
            r#"{"id":"42","command":"subscribe","parking_ids":["p1","p2"]}"#,
            &mut subs,
        );
        assert_eq!(reply.id, "42");
        assert_eq!(reply.msg_type, WsMessageType::Response);
        assert_eq!(reply.payload["count"], 2);
        assert!(subs.matches("p2"));
    }

    #[test]
    fn malformed_frames_get_an_error() {
        let mut subs = SubscriptionManager::new();
        let reply = handle_text_message("not json", &mut subs);
        assert_eq!(reply.msg_type, WsMessageType::Error);
        assert_eq!(reply.payload["code"], 400);
    }

    #[test]
    fn events_are_wrapped_in_the_envelope() {
        let event = ParkingEvent::StockChanged {
            parking_id: "p1".to_string(),
            available_places: 3,
            timestamp: chrono::Utc::now(),
        };
        let Some(json) = event_frame(&event) else {
            panic!("event should serialize");
        };
        assert!(json.contains(r#""type":"event""#));
        assert!(json.contains(r#""event_type":"stock_changed""#));
    }
}
