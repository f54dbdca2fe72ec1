//! Raw wall layouts that the carving pipeline starts from.
//!
//! A layout is a lattice of wall lines drawn on every other row and column,
//! with a random pivot past which the lines shift by one cell, a number of
//! random holes punched into the interior lines and a closed outer border.

use std::collections::BTreeSet;

use maze_chase_core::{Coord, GridSize};
use rand::{seq::index, Rng};

use crate::GeneratorConfig;

/// Draws the wall lattice for a grid.
///
/// Rows and columns are handled independently, each with its own pivot.
pub fn build_grid(size: GridSize, rng: &mut impl Rng) -> BTreeSet<Coord> {
    let mut walls = BTreeSet::new();

    for row in lattice_lines(size.rows(), rng) {
        walls.extend((0..size.columns()).map(|column| Coord::new(row, column)));
    }
    for column in lattice_lines(size.columns(), rng) {
        walls.extend((0..size.rows()).map(|row| Coord::new(row, column)));
    }

    walls
}

/// Builds a wall layout with random holes and a closed border.
pub fn build_wall(config: &GeneratorConfig, rng: &mut impl Rng) -> BTreeSet<Coord> {
    let size = config.size;
    let (border, interior): (Vec<Coord>, Vec<Coord>) = build_grid(size, rng)
        .into_iter()
        .partition(|&coord| size.is_border(coord));

    let holes = config.random_holes.min(interior.len());
    let punched: BTreeSet<usize> = index::sample(rng, interior.len(), holes)
        .into_iter()
        .collect();

    let mut walls: BTreeSet<Coord> = border.into_iter().collect();
    walls.extend(
        interior
            .into_iter()
            .enumerate()
            .filter(|(position, _)| !punched.contains(position))
            .map(|(_, coord)| coord),
    );
    walls.extend(size.coords().filter(|&coord| size.is_border(coord)));
    walls
}

fn lattice_lines(extent: u32, rng: &mut impl Rng) -> Vec<u32> {
    if extent == 0 {
        return Vec::new();
    }

    let pivot = rng.gen_range(1..=extent.saturating_sub(3).max(1));
    (0..extent)
        .step_by(2)
        .map(|line| if line > pivot { line + 1 } else { line })
        .filter(|&line| line < extent)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn lattice_spans_both_axes_and_keeps_border() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let size = GridSize::new(16, 16);
        let walls = build_grid(size, &mut rng);

        for index in 0..16 {
            assert!(walls.contains(&Coord::new(0, index)));
            assert!(walls.contains(&Coord::new(15, index)));
            assert!(walls.contains(&Coord::new(index, 0)));
            assert!(walls.contains(&Coord::new(index, 15)));
        }
    }

    #[test]
    fn holes_are_punched_only_inside() {
        let mut config = GeneratorConfig::default();
        config.random_holes = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let solid = build_wall(&config, &mut rng);

        config.random_holes = 8;
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let punched = build_wall(&config, &mut rng);

        assert_eq!(solid.len() - punched.len(), 8);
        for missing in solid.difference(&punched) {
            assert!(!config.size.is_border(*missing));
        }
    }

    #[test]
    fn excessive_holes_clear_the_interior() {
        let mut config = GeneratorConfig::default();
        config.random_holes = usize::MAX;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let walls = build_wall(&config, &mut rng);

        assert!(walls.iter().all(|coord| config.size.is_border(*coord)));
        assert_eq!(walls.len(), 60);
    }
}
