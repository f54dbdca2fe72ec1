//! Breadth-first search with predecessor chains.

use std::collections::{BTreeMap, VecDeque};

use log::debug;
use maze_chase_core::{Edge, GraphError, Path, VertexId};
use maze_chase_graph::Topology;

/// Breadth-first predecessor of every vertex reached from a start vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predecessors {
    start: VertexId,
    parents: BTreeMap<VertexId, VertexId>,
}

impl Predecessors {
    /// Vertex the search started from.
    #[must_use]
    pub const fn start(&self) -> VertexId {
        self.start
    }

    /// Vertex the search reached `vertex` from. The start has none.
    #[must_use]
    pub fn parent(&self, vertex: VertexId) -> Option<VertexId> {
        self.parents.get(&vertex).copied()
    }

    /// Reports whether the search reached the vertex.
    #[must_use]
    pub fn reaches(&self, vertex: VertexId) -> bool {
        vertex == self.start || self.parents.contains_key(&vertex)
    }
}

/// Hop count from the start vertex to every reached vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distances {
    start: VertexId,
    hops: BTreeMap<VertexId, u32>,
}

impl Distances {
    /// Vertex the distances are measured from.
    #[must_use]
    pub const fn start(&self) -> VertexId {
        self.start
    }

    /// Hop count to the vertex, if it was reached.
    #[must_use]
    pub fn get(&self, vertex: VertexId) -> Option<u32> {
        self.hops.get(&vertex).copied()
    }

    /// Number of reached vertices, start included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Reports whether no vertex was reached. Never true for a finished search.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Reached vertices ordered by descending distance, ties by ascending id.
    #[must_use]
    pub fn ranked_farthest(&self) -> Vec<VertexId> {
        let mut ranked: Vec<(VertexId, u32)> =
            self.hops.iter().map(|(&vertex, &hops)| (vertex, hops)).collect();
        ranked.sort_by(|(a, hops_a), (b, hops_b)| hops_b.cmp(hops_a).then(a.cmp(b)));
        ranked.into_iter().map(|(vertex, _)| vertex).collect()
    }
}

/// Runs a breadth-first search and returns the predecessor of every vertex.
pub fn bfs_traversal(topology: &Topology, start: VertexId) -> Result<Predecessors, GraphError> {
    bfs_distances(topology, start).map(|(_, predecessors)| predecessors)
}

/// Runs a breadth-first search returning both hop counts and predecessors.
pub fn bfs_distances(
    topology: &Topology,
    start: VertexId,
) -> Result<(Distances, Predecessors), GraphError> {
    let _ = topology.require_vertex(start)?;

    let mut hops = BTreeMap::from([(start, 0_u32)]);
    let mut parents = BTreeMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(vertex) = queue.pop_front() {
        let next = hops.get(&vertex).copied().unwrap_or_default() + 1;
        for neighbor in topology.neighbors(vertex) {
            if hops.contains_key(&neighbor) {
                continue;
            }
            let _ = hops.insert(neighbor, next);
            let _ = parents.insert(neighbor, vertex);
            queue.push_back(neighbor);
        }
    }

    debug!(
        "breadth-first search from {} reached {} vertices",
        start.get(),
        hops.len()
    );

    Ok((
        Distances { start, hops },
        Predecessors { start, parents },
    ))
}

/// Follows the predecessor chain back from `end` until `start`.
///
/// A start equal to the end yields an empty path.
pub fn reconstruct_path(
    predecessors: &Predecessors,
    start: VertexId,
    end: VertexId,
) -> Result<Path, GraphError> {
    let mut edges = Vec::new();
    let mut current = end;

    while current != start {
        let parent = predecessors
            .parent(current)
            .ok_or(GraphError::Unreachable { from: start, to: end })?;
        edges.push(Edge::new(parent, current));
        current = parent;
    }

    edges.reverse();
    Ok(Path::new(edges))
}

/// Shortest path between two vertices.
pub fn shortest_path(
    topology: &Topology,
    start: VertexId,
    end: VertexId,
) -> Result<Path, GraphError> {
    let predecessors = bfs_traversal(topology, start)?;
    reconstruct_path(&predecessors, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{Coord, GridSize};
    use std::collections::BTreeSet;

    fn open_grid(rows: u32, columns: u32) -> Topology {
        Topology::from_open_cells(GridSize::new(rows, columns), &BTreeSet::new())
    }

    #[test]
    fn distances_grow_by_one_per_ring() {
        let topology = open_grid(3, 3);
        let (distances, predecessors) =
            bfs_distances(&topology, VertexId::new(4)).expect("start exists");

        assert_eq!(distances.get(VertexId::new(4)), Some(0));
        assert_eq!(distances.get(VertexId::new(1)), Some(1));
        assert_eq!(distances.get(VertexId::new(0)), Some(2));
        assert_eq!(predecessors.parent(VertexId::new(4)), None);
        assert!(predecessors.reaches(VertexId::new(8)));
    }

    #[test]
    fn ranking_breaks_ties_by_ascending_id() {
        let topology = open_grid(3, 3);
        let (distances, _) = bfs_distances(&topology, VertexId::new(4)).expect("start exists");

        let ranked = distances.ranked_farthest();
        assert_eq!(
            ranked,
            [0, 2, 6, 8, 1, 3, 5, 7, 4].map(VertexId::new).to_vec()
        );
    }

    #[test]
    fn unknown_start_is_rejected() {
        let topology = open_grid(1, 2);
        assert_eq!(
            bfs_traversal(&topology, VertexId::new(7)).err(),
            Some(GraphError::UnknownVertex(VertexId::new(7)))
        );
    }

    #[test]
    fn walled_off_vertex_is_unreachable() {
        let walls = BTreeSet::from([Coord::new(0, 1)]);
        let topology = Topology::from_open_cells(GridSize::new(1, 3), &walls);

        assert_eq!(
            shortest_path(&topology, VertexId::new(0), VertexId::new(2)),
            Err(GraphError::Unreachable {
                from: VertexId::new(0),
                to: VertexId::new(2),
            })
        );
    }

    #[test]
    fn path_to_start_is_empty() {
        let topology = open_grid(2, 2);
        let path = shortest_path(&topology, VertexId::new(3), VertexId::new(3)).expect("trivial");
        assert!(path.is_empty());
    }
}
