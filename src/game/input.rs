use super::types::{Direction, MovementMode};

/// Builds a direction from raw wire components, rejecting anything outside {-1, 0, 1}.
pub fn parse_direction(x: i64, y: i64) -> Option<Direction> {
    if !(-1..=1).contains(&x) || !(-1..=1).contains(&y) {
        return None;
    }
    Some(Direction::new(x as i32, y as i32))
}

pub fn is_allowed(direction: Direction, mode: MovementMode) -> bool {
    if direction.is_idle() {
        return false;
    }
    match mode {
        MovementMode::FourWay => !direction.is_diagonal(),
        MovementMode::EightWay => true,
    }
}

/// True when `next` negates `current` on an axis where `next` is nonzero.
pub fn is_reversal(current: Direction, next: Direction) -> bool {
    (next.x != 0 && current.x == -next.x) || (next.y != 0 && current.y == -next.y)
}
