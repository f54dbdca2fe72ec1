//! Chaser that re-plans a breadth-first approach toward an explorer's walk.

use log::debug;
use maze_chase_core::{GraphError, Path, VertexId};
use maze_chase_graph::Topology;

use crate::bfs::shortest_path;

/// Moves a chaser one edge per walker edge toward the walker's current cell.
///
/// Before the walker takes edge `i`, the chaser re-plans the shortest path
/// to that edge's source and takes the first step. The chase ends when the
/// step lands on the walker's cell, when the chaser already stands on it, or
/// when the walk runs out, so the result never has more edges than `walk`.
pub fn race_path(
    topology: &Topology,
    walk: &Path,
    chaser_start: VertexId,
) -> Result<Path, GraphError> {
    let _ = topology.require_vertex(chaser_start)?;

    let mut chaser = chaser_start;
    let mut path = Path::default();
    for edge in walk.iter() {
        let approach = shortest_path(topology, chaser, edge.from())?;
        let Some(&step) = approach.edges().first() else {
            break;
        };
        path.push(step);
        chaser = step.to();
        if approach.len() == 1 {
            break;
        }
    }

    debug!(
        "chaser from {} took {} of {} walker steps",
        chaser_start.get(),
        path.len(),
        walk.len()
    );
    Ok(path)
}

/// Index of the walker step during which the chaser reached the walker.
///
/// The chaser catches the walker either by stepping onto the cell the walker
/// is leaving, or by standing still while the walker's next step starts on
/// the chaser's cell. Returns `None` when the walker outran the chaser.
#[must_use]
pub fn caught_at(walk: &Path, chaser_start: VertexId, chaser: &Path) -> Option<usize> {
    let steps = chaser.len();
    let position = chaser.last_vertex().unwrap_or(chaser_start);
    let leaving = |index: usize| walk.edges().get(index).map(|edge| edge.from());

    if let Some(last) = steps.checked_sub(1) {
        if leaving(last) == Some(position) {
            return Some(last);
        }
    }
    (leaving(steps) == Some(position)).then_some(steps)
}
