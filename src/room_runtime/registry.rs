use super::{spawn_room, RoomHandle};
use crate::game::types::GameSettings;
use crate::shared::room_id::generate_room_id;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::Mutex;

/// Owns every live room. Rooms sit in an arena keyed by creation sequence,
/// with an index from room id, and are only created or destroyed here.
#[derive(Debug)]
pub struct RoomRegistry {
    settings: GameSettings,
    inner: Mutex<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    next_seq: u64,
    rooms: BTreeMap<u64, RoomSlot>,
    index: HashMap<String, u64>,
}

#[derive(Debug)]
struct RoomSlot {
    handle: RoomHandle,
    members: HashSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStats {
    pub room_id: String,
    pub player_count: usize,
}

impl RoomRegistry {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            inner: Mutex::new(RegistryState::default()),
        }
    }

    /// Reserves a seat for `session_id` in the oldest room with space, creating
    /// a room when all are full.
    pub async fn assign(&self, session_id: &str) -> RoomHandle {
        let mut state = self.inner.lock().await;
        let capacity = self.settings.room_capacity;
        if let Some(slot) = state
            .rooms
            .values_mut()
            .find(|slot| slot.members.len() < capacity)
        {
            slot.members.insert(session_id.to_string());
            return slot.handle.clone();
        }

        let room_id = generate_room_id(|candidate| state.index.contains_key(candidate));
        let handle = spawn_room(room_id.clone(), self.settings);
        let seq = state.next_seq;
        state.next_seq += 1;
        state.index.insert(room_id.clone(), seq);
        state.rooms.insert(
            seq,
            RoomSlot {
                handle: handle.clone(),
                members: HashSet::from([session_id.to_string()]),
            },
        );
        tracing::info!(room_id, rooms = state.rooms.len(), "room created");
        handle
    }

    /// Frees the session's seat. The room is looked up again by id under the
    /// lock, so a room already torn down by a concurrent release is skipped.
    /// Returns true when this call destroyed the room.
    pub async fn release(&self, room_id: &str, session_id: &str) -> bool {
        let mut state = self.inner.lock().await;
        let Some(&seq) = state.index.get(room_id) else { return false };
        let Some(slot) = state.rooms.get_mut(&seq) else { return false };
        if !slot.members.remove(session_id) || !slot.members.is_empty() {
            return false;
        }

        if let Some(slot) = state.rooms.remove(&seq) {
            slot.handle.stop();
        }
        state.index.remove(room_id);
        tracing::info!(room_id, rooms = state.rooms.len(), "room closed");
        true
    }

    pub async fn stats(&self) -> Vec<RoomStats> {
        let state = self.inner.lock().await;
        state
            .rooms
            .values()
            .map(|slot| RoomStats {
                room_id: slot.handle.room_id().to_string(),
                player_count: slot.members.len(),
            })
            .collect()
    }
}
