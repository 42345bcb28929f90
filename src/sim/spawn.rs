//! Food placement

use rand::Rng;

use super::grid::Position;
use crate::consts::{GRID_SIZE, SPAWN_RANDOM_ATTEMPTS};
use crate::error::GameError;

/// Pick a cell not covered by `occupied`.
///
/// Uniform random draws first, then a row-major scan so a crowded board
/// still terminates. A full board is `SpawnFailure`.
pub fn find_free_cell<'a, I, R>(occupied: I, rng: &mut R) -> Result<Position, GameError>
where
    I: IntoIterator<Item = &'a Position>,
    I::IntoIter: Clone,
    R: Rng + ?Sized,
{
    let occupied = occupied.into_iter();
    let is_free = |pos: Position| !occupied.clone().any(|p| *p == pos);

    for _ in 0..SPAWN_RANDOM_ATTEMPTS {
        let pos = Position::new(
            rng.random_range(0..GRID_SIZE),
            rng.random_range(0..GRID_SIZE),
        );
        if is_free(pos) {
            return Ok(pos);
        }
    }

    log::debug!("Random food placement exhausted, scanning board");
    (0..GRID_SIZE)
        .flat_map(|y| (0..GRID_SIZE).map(move |x| Position::new(x, y)))
        .find(|&pos| is_free(pos))
        .ok_or(GameError::SpawnFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::VecDeque;

    fn all_cells() -> Vec<Position> {
        (0..GRID_SIZE)
            .flat_map(|y| (0..GRID_SIZE).map(move |x| Position::new(x, y)))
            .collect()
    }

    #[test]
    fn test_full_board_fails() {
        let cells = all_cells();
        let mut rng = Pcg32::seed_from_u64(5);
        assert!(matches!(
            find_free_cell(&cells, &mut rng),
            Err(GameError::SpawnFailure)
        ));
    }

    #[test]
    fn test_single_gap_found_by_scan() {
        let gap = Position::new(13, 17);
        let cells: Vec<Position> = all_cells().into_iter().filter(|&p| p != gap).collect();
        let mut rng = Pcg32::seed_from_u64(9);
        assert_eq!(find_free_cell(&cells, &mut rng).unwrap(), gap);
    }

    #[test]
    fn test_empty_board_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(0);
        let empty: Vec<Position> = Vec::new();
        let pos = find_free_cell(&empty, &mut rng).unwrap();
        assert!(super::super::grid::in_bounds(pos));
    }

    proptest! {
        #[test]
        fn prop_food_never_on_snake(
            cells in proptest::collection::vec((0..GRID_SIZE, 0..GRID_SIZE), 1..300),
            seed in any::<u64>(),
        ) {
            let body: VecDeque<Position> =
                cells.into_iter().map(|(x, y)| Position::new(x, y)).collect();
            let mut rng = Pcg32::seed_from_u64(seed);
            let pos = find_free_cell(&body, &mut rng).unwrap();
            prop_assert!(!body.contains(&pos));
            prop_assert!(super::super::grid::in_bounds(pos));
        }
    }
}
