use super::constants::FALLBACK_CELL;
use super::grid::{random_cell, step};
use super::types::{Cell, Player};
use rand::Rng;

/// Picks a random free cell, falling back to `FALLBACK_CELL` once `grid_size²`
/// samples have all been rejected.
///
/// Only active players block placement: dead and paused bodies are transparent
/// here just as they are to collisions. Existing food and the cell directly
/// ahead of each active head are rejected too.
pub fn find_safe_cell<R: Rng + ?Sized>(
    players: &[Player],
    food: &[Cell],
    grid_size: i32,
    rng: &mut R,
) -> Cell {
    let attempts = grid_size.saturating_mul(grid_size).max(1);
    for _ in 0..attempts {
        let candidate = random_cell(rng, grid_size);
        if is_free(players, food, grid_size, candidate) {
            return candidate;
        }
    }
    tracing::debug!(grid_size, "no free cell found, using fallback");
    Cell::new(FALLBACK_CELL.0, FALLBACK_CELL.1)
}

fn is_free(players: &[Player], food: &[Cell], grid_size: i32, candidate: Cell) -> bool {
    if food.contains(&candidate) {
        return false;
    }
    for player in players.iter().filter(|player| player.is_active()) {
        if player.occupies(candidate) {
            return false;
        }
        let Some(head) = player.head() else { continue };
        if !player.direction.is_idle() && step(head, player.direction, grid_size) == candidate {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Direction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn player_covering(id: &str, cells: impl IntoIterator<Item = Cell>) -> Player {
        let mut player = Player::new(id.to_string(), id.to_string());
        player.body = cells.into_iter().collect::<VecDeque<_>>();
        player.is_alive = true;
        player
    }

    fn every_cell_but(grid_size: i32, free: &[Cell]) -> Vec<Cell> {
        (0..grid_size)
            .flat_map(|x| (0..grid_size).map(move |y| Cell::new(x, y)))
            .filter(|cell| !free.contains(cell))
            .collect()
    }

    fn fallback() -> Cell {
        Cell::new(FALLBACK_CELL.0, FALLBACK_CELL.1)
    }

    #[test]
    fn only_the_free_cell_or_the_fallback_is_returned() {
        let free = Cell::new(2, 3);
        let players = vec![player_covering("a", every_cell_but(4, &[free]))];
        let mut rng = StdRng::seed_from_u64(1);
        let picks: Vec<Cell> = (0..20)
            .map(|_| find_safe_cell(&players, &[], 4, &mut rng))
            .collect();
        assert!(picks.iter().all(|cell| *cell == free || *cell == fallback()));
        assert!(picks.contains(&free));
    }

    #[test]
    fn full_grid_falls_back_to_origin() {
        let players = vec![player_covering("a", every_cell_but(3, &[]))];
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(find_safe_cell(&players, &[], 3, &mut rng), Cell::new(0, 0));
    }

    #[test]
    fn paused_and_dead_bodies_are_transparent() {
        let mut paused = player_covering("paused", every_cell_but(3, &[]));
        paused.is_paused = true;
        let mut dead = player_covering("dead", every_cell_but(3, &[]));
        dead.is_alive = false;
        let players = vec![paused, dead];
        let mut rng = StdRng::seed_from_u64(3);
        let cell = find_safe_cell(&players, &[], 3, &mut rng);
        assert!((0..3).contains(&cell.x) && (0..3).contains(&cell.y));
        // With only those two on the board the full grid is available, so
        // sampling must eventually land off the origin.
        let spread = (0..50)
            .map(|_| find_safe_cell(&players, &[], 3, &mut rng))
            .any(|cell| cell != Cell::new(0, 0));
        assert!(spread);
    }

    #[test]
    fn blocked_cells_are_never_chosen_but_paused_cells_are() {
        let blocked: Vec<Cell> = (4..8)
            .flat_map(|x| (4..8).map(move |y| Cell::new(x, y)))
            .collect();
        let paused_cells: Vec<Cell> = (1..4).map(|x| Cell::new(x, 1)).collect();
        let mut paused = player_covering("paused", paused_cells.clone());
        paused.is_paused = true;
        let players = vec![paused, player_covering("blocker", blocked.clone())];
        let mut rng = StdRng::seed_from_u64(4);
        let picks: Vec<Cell> = (0..400)
            .map(|_| find_safe_cell(&players, &[], 10, &mut rng))
            .collect();
        assert!(picks.iter().all(|cell| !blocked.contains(cell)));
        assert!(picks.iter().any(|cell| paused_cells.contains(cell)));
    }

    #[test]
    fn food_and_next_head_cells_are_never_chosen() {
        let food = [Cell::new(1, 2)];
        let mut mover = player_covering("mover", [Cell::new(2, 1)]);
        mover.direction = Direction::new(0, 1);
        let ahead = Cell::new(2, 2);
        let players = vec![mover];
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let cell = find_safe_cell(&players, &food, 3, &mut rng);
            assert!(cell != food[0] && cell != ahead && cell != Cell::new(2, 1));
        }
    }

    #[test]
    fn oversized_grid_does_not_overflow_the_attempt_bound() {
        let mut rng = StdRng::seed_from_u64(6);
        let cell = find_safe_cell(&[], &[], i32::MAX, &mut rng);
        assert!(cell.x >= 0 && cell.y >= 0);
    }
}
