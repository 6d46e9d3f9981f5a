use crate::protocol::decode_client_message;
use crate::room_runtime::{RoomCommand, RoomRegistry};
use crate::visits::VisitStore;
use axum::extract::ws::{Message, WebSocket};
use axum::http::HeaderMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub async fn handle_socket(
    socket: WebSocket,
    registry: Arc<RoomRegistry>,
    visits: VisitStore,
    client_ip: String,
) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    let session_id = Uuid::new_v4().to_string();

    visits.record_in_background(client_ip);
    let room = registry.assign(&session_id).await;
    tracing::info!(session_id, room_id = room.room_id(), "session connected");
    room.send(RoomCommand::Join {
        session_id: session_id.clone(),
        outbound: outbound_tx,
    });

    let send_task = tokio::spawn(async move {
        while let Some(payload) = outbound_rx.recv().await {
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => match decode_client_message(&text) {
                Some(message) => {
                    room.send(RoomCommand::from_client(&session_id, message));
                }
                None => tracing::debug!(session_id, "ignored malformed client message"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    room.send(RoomCommand::Leave {
        session_id: session_id.clone(),
    });
    registry.release(room.room_id(), &session_id).await;
    send_task.abort();
    tracing::info!(session_id, room_id = room.room_id(), "session disconnected");
}

/// First `X-Forwarded-For` hop when a proxy supplied one, else the peer address.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}
