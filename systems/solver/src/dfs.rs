//! Depth-first exploration tours and the walks reconstructed from them.
//!
//! A stack-driven search visits vertices in an order where consecutive
//! vertices are not always neighbours: after a dead end the search resumes
//! from an entry pushed much earlier. [`reconstruct_walk`] closes those gaps
//! by climbing the discovery tree back to the vertex that pushed the resumed
//! entry, so the resulting walk only uses genuine edges.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use maze_chase_core::{Edge, GraphError, Path, VertexId};
use maze_chase_graph::Topology;

/// Record of a single depth-first exploration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tour {
    start: VertexId,
    order: Vec<VertexId>,
    tour_predecessor: BTreeMap<VertexId, VertexId>,
    parent: BTreeMap<VertexId, VertexId>,
    gaps: Vec<VertexId>,
}

impl Tour {
    /// Vertex the exploration started from.
    #[must_use]
    pub const fn start(&self) -> VertexId {
        self.start
    }

    /// Vertices in discovery order.
    #[must_use]
    pub fn order(&self) -> &[VertexId] {
        &self.order
    }

    /// Reports whether the exploration discovered the vertex.
    #[must_use]
    pub fn contains(&self, vertex: VertexId) -> bool {
        vertex == self.start || self.parent.contains_key(&vertex)
    }

    /// Vertex discovered immediately before `vertex`, adjacent or not.
    #[must_use]
    pub fn tour_predecessor(&self, vertex: VertexId) -> Option<VertexId> {
        self.tour_predecessor.get(&vertex).copied()
    }

    /// Neighbour whose stack entry led to the discovery of `vertex`.
    #[must_use]
    pub fn parent(&self, vertex: VertexId) -> Option<VertexId> {
        self.parent.get(&vertex).copied()
    }

    /// Vertices whose tour predecessor is not one of their neighbours.
    #[must_use]
    pub fn gaps(&self) -> &[VertexId] {
        &self.gaps
    }

    /// Discovery-tree path from the start to `end`, without detours.
    pub fn discovery_path(&self, end: VertexId) -> Result<Path, GraphError> {
        if !self.contains(end) {
            return Err(self.unreachable(end));
        }

        let mut edges = Vec::new();
        let mut current = end;
        while let Some(parent) = self.parent(current) {
            edges.push(Edge::new(parent, current));
            current = parent;
        }
        edges.reverse();
        Ok(Path::new(edges))
    }

    fn unreachable(&self, end: VertexId) -> GraphError {
        GraphError::Unreachable {
            from: self.start,
            to: end,
        }
    }
}

/// Explores the topology depth-first from `start`.
///
/// Neighbours are pushed in ascending order, so the largest identifier is
/// explored first.
pub fn dfs_tour(topology: &Topology, start: VertexId) -> Result<Tour, GraphError> {
    let _ = topology.require_vertex(start)?;

    let mut visited = BTreeSet::new();
    let mut order = Vec::new();
    let mut tour_predecessor = BTreeMap::new();
    let mut parent = BTreeMap::new();
    let mut gaps = Vec::new();
    let mut stack: Vec<(VertexId, Option<VertexId>)> = vec![(start, None)];

    while let Some((vertex, pushed_by)) = stack.pop() {
        if !visited.insert(vertex) {
            continue;
        }

        if let Some(&previous) = order.last() {
            let _ = tour_predecessor.insert(vertex, previous);
            if !topology.are_adjacent(previous, vertex) {
                gaps.push(vertex);
            }
        }
        if let Some(pusher) = pushed_by {
            let _ = parent.insert(vertex, pusher);
        }
        order.push(vertex);

        stack.extend(
            topology
                .neighbors(vertex)
                .filter(|neighbor| !visited.contains(neighbor))
                .map(|neighbor| (neighbor, Some(vertex))),
        );
    }

    debug!(
        "depth-first tour from {} discovered {} vertices with {} gaps",
        start.get(),
        order.len(),
        gaps.len()
    );

    Ok(Tour {
        start,
        order,
        tour_predecessor,
        parent,
        gaps,
    })
}

/// Contiguous exploration walk from the tour's start to `end`.
///
/// Every gap in the discovery order is replaced by the climb from the last
/// visited vertex up to the discovering parent followed by the step down to
/// the newly discovered vertex. Each discovery-tree edge is walked down once
/// and back up at most once.
pub fn reconstruct_walk(tour: &Tour, end: VertexId) -> Result<Path, GraphError> {
    if !tour.contains(end) {
        return Err(tour.unreachable(end));
    }
    if end == tour.start {
        return Ok(Path::default());
    }

    let mut walk = Path::default();
    for pair in tour.order.windows(2) {
        let (last, next) = (pair[0], pair[1]);
        if tour.parent(next) == Some(last) {
            walk.push(Edge::new(last, next));
        } else {
            let anchor = tour.parent(next).ok_or(tour.unreachable(next))?;
            let mut current = last;
            while current != anchor {
                let up = tour.parent(current).ok_or(GraphError::Unreachable {
                    from: last,
                    to: anchor,
                })?;
                walk.push(Edge::new(current, up));
                current = up;
            }
            walk.push(Edge::new(anchor, next));
        }

        if next == end {
            break;
        }
    }

    debug_assert!(walk.is_contiguous());
    Ok(walk)
}
