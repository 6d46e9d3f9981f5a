pub const GRID_SIZE: i32 = 30;
pub const MAX_GRID_SIZE: i32 = 1000;
pub const TICK_MS: u64 = 120;
pub const ROOM_CAPACITY: usize = 4;
pub const SPAWN_PROTECTION_TICKS: u8 = 1;
pub const FALLBACK_CELL: (i32, i32) = (0, 0);

pub const NAME_NUMBER_LIMIT: u32 = 100;

pub const ADJECTIVES: [&str; 12] = [
    "Agile", "Brave", "Clever", "Daring", "Eager", "Fast", "Glowing", "Happy", "Iron", "Jolly",
    "Keen", "Lucky",
];

pub const ANIMALS: [&str; 12] = [
    "Ape", "Bear", "Cat", "Dog", "Eagle", "Fox", "Goat", "Hawk", "Impala", "Jaguar", "Koala",
    "Lion",
];
