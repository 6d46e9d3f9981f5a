use crate::game::constants::MAX_GRID_SIZE;
use crate::game::types::{GameSettings, MovementMode};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitStoreKind {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    pub database_url: String,
    pub visit_store: VisitStoreKind,
    pub admin_password: Option<String>,
    pub game: GameSettings,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = GameSettings::default();
        let parsed = |name: &str| lookup(name).map(|value| value.trim().to_string());

        let tick_ms = parse_or(parsed("TICK_MS"), defaults.tick_interval.as_millis() as u64);
        let game = GameSettings {
            grid_size: parse_or(parsed("GRID_SIZE"), defaults.grid_size).clamp(1, MAX_GRID_SIZE),
            tick_interval: Duration::from_millis(tick_ms.max(1)),
            room_capacity: parse_or(parsed("ROOM_CAPACITY"), defaults.room_capacity).max(1),
            spawn_protection_ticks: parse_or(
                parsed("SPAWN_PROTECTION_TICKS"),
                defaults.spawn_protection_ticks,
            ),
            movement: if parsed("ALLOW_DIAGONALS").is_some_and(|value| is_falsy(&value)) {
                MovementMode::FourWay
            } else {
                MovementMode::EightWay
            },
        };

        let visit_store = match parsed("VISIT_STORE").as_deref() {
            Some("memory") => VisitStoreKind::Memory,
            _ => VisitStoreKind::Sqlite,
        };

        Self {
            port: parse_or(parsed("PORT"), DEFAULT_PORT),
            static_dir: parsed("STATIC_DIR")
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            database_url: parsed("DATABASE_URL")
                .filter(|value| !value.is_empty())
                .unwrap_or_else(default_database_url),
            visit_store,
            admin_password: parsed("ADMIN_PASSWORD").filter(|value| !value.is_empty()),
            game,
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|value| value.parse().ok()).unwrap_or(default)
}

fn is_falsy(value: &str) -> bool {
    matches!(value, "0" | "false" | "FALSE" | "no")
}

fn default_database_url() -> String {
    let base = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let default_path = base.join("data").join("visits.db");
    format!("sqlite://{}", default_path.display())
}
