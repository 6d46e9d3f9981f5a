use crate::game::input::parse_direction;
use crate::game::types::{Direction, GameStateSnapshot};
use serde::{Deserialize, Serialize};

pub const EVENT_START_GAME: &str = "startGame";
pub const EVENT_DIRECTION_CHANGE: &str = "directionChange";
pub const EVENT_TOGGLE_PAUSE: &str = "toggle-pause";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    StartGame,
    DirectionChange(Direction),
    TogglePause,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct DirectionPayload {
    x: i64,
    y: i64,
}

/// Decodes one `{"event", "data"}` text frame. Unknown events and payloads
/// that fail validation yield `None`.
pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
    let envelope: Envelope = serde_json::from_str(text).ok()?;
    match envelope.event.as_str() {
        EVENT_START_GAME => Some(ClientMessage::StartGame),
        EVENT_TOGGLE_PAUSE => Some(ClientMessage::TogglePause),
        EVENT_DIRECTION_CHANGE => {
            let payload: DirectionPayload = serde_json::from_value(envelope.data).ok()?;
            parse_direction(payload.x, payload.y).map(ClientMessage::DirectionChange)
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitPayload {
    pub id: String,
    pub name: String,
    pub room_id: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerMessage<'a> {
    #[serde(rename = "init")]
    Init(InitPayload),
    #[serde(rename = "gameState")]
    GameState(GameStateSnapshot<'a>),
}

impl ServerMessage<'_> {
    pub fn encode(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(text) => Some(text),
            Err(error) => {
                tracing::warn!(?error, "failed to encode server message");
                None
            }
        }
    }
}
