//! Wall removal along spanning-tree bridges plus border openings.

use std::collections::BTreeSet;

use log::debug;
use maze_chase_core::{BorderSide, ComponentId, Coord, GraphError, GridSize};
use maze_chase_graph::Topology;
use rand::Rng;

use crate::meta_graph::MetaGraph;

/// Wall cell separating two bridge endpoints.
///
/// Endpoints two cells apart along a row or column share their midpoint.
/// Diagonal endpoints are joined through `(b.row, a.column)`; see
/// [`diagonal_alternate`] for the other cell touching both.
#[must_use]
pub fn wall_between(a: Coord, b: Coord) -> Option<Coord> {
    match a.squared_distance(b) {
        4 => Some(Coord::new(
            (a.row() + b.row()) / 2,
            (a.column() + b.column()) / 2,
        )),
        2 => Some(Coord::new(b.row(), a.column())),
        _ => None,
    }
}

/// Second cell orthogonally adjacent to both diagonal endpoints.
#[must_use]
pub fn diagonal_alternate(a: Coord, b: Coord) -> Option<Coord> {
    (a.squared_distance(b) == 2).then_some(Coord::new(a.row(), b.column()))
}

/// Removes the wall cell behind every spanning-tree edge.
///
/// Returns the number of cells removed. A bridge whose endpoints already
/// touch an open connecting cell is left alone, so carving twice changes
/// nothing the second time.
pub fn carve(
    tree: &[(ComponentId, ComponentId)],
    meta: &MetaGraph,
    topology: &Topology,
    walls: &mut BTreeSet<Coord>,
) -> usize {
    let mut removed = 0;

    for &(a, b) in tree {
        let Some(bridge) = meta.bridge(a, b) else {
            continue;
        };
        let (Some(from), Some(to)) = (topology.coord(bridge.from()), topology.coord(bridge.to()))
        else {
            continue;
        };
        let Some(primary) = wall_between(from, to) else {
            continue;
        };

        let already_open = !walls.contains(&primary)
            || diagonal_alternate(from, to).map_or(false, |cell| !walls.contains(&cell));
        if already_open {
            continue;
        }

        if walls.remove(&primary) {
            removed += 1;
        }
    }

    debug!("carved {removed} wall cells along {} tree edges", tree.len());
    removed
}

/// Opens a cell on the left border whose inner neighbour is open.
pub fn carve_entrance(
    walls: &mut BTreeSet<Coord>,
    size: GridSize,
    rng: &mut impl Rng,
) -> Result<Coord, GraphError> {
    carve_opening(walls, size, BorderSide::Left, rng)
}

/// Opens a cell on the right border whose inner neighbour is open.
pub fn carve_exit(
    walls: &mut BTreeSet<Coord>,
    size: GridSize,
    rng: &mut impl Rng,
) -> Result<Coord, GraphError> {
    carve_opening(walls, size, BorderSide::Right, rng)
}

/// Opens both the entrance and the exit.
pub fn carve_entrance_exit(
    walls: &mut BTreeSet<Coord>,
    size: GridSize,
    rng: &mut impl Rng,
) -> Result<(Coord, Coord), GraphError> {
    let entrance = carve_entrance(walls, size, rng)?;
    let exit = carve_exit(walls, size, rng)?;
    Ok((entrance, exit))
}

fn carve_opening(
    walls: &mut BTreeSet<Coord>,
    size: GridSize,
    side: BorderSide,
    rng: &mut impl Rng,
) -> Result<Coord, GraphError> {
    if size.rows() < 3 || size.columns() < 3 {
        return Err(GraphError::CarvingExhausted { side });
    }

    let (inner, outer) = match side {
        BorderSide::Left => (1, 0),
        BorderSide::Right => (size.columns() - 2, size.columns() - 1),
    };
    let last_row = size.rows() - 2;
    let admits = |row: u32, walls: &BTreeSet<Coord>| !walls.contains(&Coord::new(row, inner));

    if !(1..=last_row).any(|row| admits(row, walls)) {
        return Err(GraphError::CarvingExhausted { side });
    }

    let mut row = rng.gen_range(1..=last_row);
    while !admits(row, walls) {
        row = rng.gen_range(1..=last_row);
    }

    let opening = Coord::new(row, outer);
    let _ = walls.remove(&opening);
    debug!("opened {side:?} border at row {row}");
    Ok(opening)
}
