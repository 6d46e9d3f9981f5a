use super::spawn::find_safe_cell;
use super::types::{Cell, Player};
use rand::Rng;

/// Brings the food count back to one per player.
pub fn rebalance<R: Rng + ?Sized>(
    food: &mut Vec<Cell>,
    players: &[Player],
    grid_size: i32,
    rng: &mut R,
) {
    let target = players.len();
    while food.len() < target {
        let cell = find_safe_cell(players, food, grid_size, rng);
        food.push(cell);
    }
    food.truncate(target);
}
