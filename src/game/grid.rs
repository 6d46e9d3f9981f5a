use super::types::{Cell, Direction};
use rand::Rng;

pub fn wrap(value: i32, grid_size: i32) -> i32 {
    value.rem_euclid(grid_size)
}

/// Moves one step along `direction`, wrapping each axis independently.
pub fn step(cell: Cell, direction: Direction, grid_size: i32) -> Cell {
    Cell {
        x: wrap(cell.x + direction.x, grid_size),
        y: wrap(cell.y + direction.y, grid_size),
    }
}

pub fn random_cell<R: Rng + ?Sized>(rng: &mut R, grid_size: i32) -> Cell {
    Cell {
        x: rng.gen_range(0..grid_size),
        y: rng.gen_range(0..grid_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn step_wraps_every_edge() {
        let last = 29;
        assert_eq!(step(Cell::new(last, 4), Direction::new(1, 0), 30), Cell::new(0, 4));
        assert_eq!(step(Cell::new(0, 4), Direction::new(-1, 0), 30), Cell::new(last, 4));
        assert_eq!(step(Cell::new(7, last), Direction::new(0, 1), 30), Cell::new(7, 0));
        assert_eq!(step(Cell::new(7, 0), Direction::new(0, -1), 30), Cell::new(7, last));
    }

    #[test]
    fn diagonal_step_wraps_axes_independently() {
        assert_eq!(step(Cell::new(29, 0), Direction::new(1, -1), 30), Cell::new(0, 29));
        assert_eq!(step(Cell::new(29, 5), Direction::new(1, 1), 30), Cell::new(0, 6));
    }

    #[test]
    fn random_cell_stays_on_grid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let cell = random_cell(&mut rng, 5);
            assert!((0..5).contains(&cell.x));
            assert!((0..5).contains(&cell.y));
        }
    }
}
