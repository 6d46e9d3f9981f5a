use super::constants::{GRID_SIZE, ROOM_CAPACITY, SPAWN_PROTECTION_TICKS, TICK_MS};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Unit step on the grid. `(0, 0)` is the idle sentinel a fresh spawn starts with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    pub x: i32,
    pub y: i32,
}

impl Direction {
    pub const IDLE: Direction = Direction { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_idle(self) -> bool {
        self == Self::IDLE
    }

    pub fn is_diagonal(self) -> bool {
        self.x != 0 && self.y != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementMode {
    FourWay,
    EightWay,
}

#[derive(Debug, Clone, Copy)]
pub struct GameSettings {
    pub grid_size: i32,
    pub tick_interval: Duration,
    pub room_capacity: usize,
    pub spawn_protection_ticks: u8,
    pub movement: MovementMode,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            tick_interval: Duration::from_millis(TICK_MS),
            room_capacity: ROOM_CAPACITY,
            spawn_protection_ticks: SPAWN_PROTECTION_TICKS,
            movement: MovementMode::EightWay,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub body: VecDeque<Cell>,
    pub direction: Direction,
    pub score: u32,
    pub is_alive: bool,
    pub is_paused: bool,
    pub spawn_protection: u8,
}

impl Player {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            body: VecDeque::new(),
            direction: Direction::IDLE,
            score: 0,
            is_alive: false,
            is_paused: false,
            spawn_protection: 0,
        }
    }

    pub fn head(&self) -> Option<Cell> {
        self.body.front().copied()
    }

    /// Alive and not paused: the only players that move, collide, or block spawns.
    pub fn is_active(&self) -> bool {
        self.is_alive && !self.is_paused
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }
}

/// Serializes players as an `id -> snapshot` map in join order.
#[derive(Debug, Clone, Copy)]
pub struct PlayersById<'a>(pub &'a [Player]);

impl Serialize for PlayersById<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for player in self.0 {
            map.serialize_entry(&player.id, player)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GameStateSnapshot<'a> {
    pub players: PlayersById<'a>,
    pub food: &'a [Cell],
}
