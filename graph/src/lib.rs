#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid-graph engine shared by the maze-chase systems.
//!
//! A [`Topology`] binds vertex identifiers to grid coordinates and derives an
//! undirected, 4-connected adjacency from them. The [`components`] module
//! partitions a topology into connected components, either by depth-first
//! search or through the [`UnionFind`] structure.

pub mod components;
pub mod union_find;

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use maze_chase_core::{Coord, GraphError, GridSize, VertexId};

pub use components::{components_by_dfs, components_by_union_find, Components};
pub use union_find::UnionFind;

/// Undirected adjacency keyed by an ordered node type.
///
/// Every node is present as a key, isolated nodes map to an empty set, and
/// links are always stored in both directions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adjacency<N: Ord + Copy> {
    neighbors: BTreeMap<N, BTreeSet<N>>,
}

impl<N: Ord + Copy> Default for Adjacency<N> {
    fn default() -> Self {
        Self {
            neighbors: BTreeMap::new(),
        }
    }
}

impl<N: Ord + Copy> Adjacency<N> {
    /// Creates an adjacency holding the provided nodes and no links.
    #[must_use]
    pub fn with_nodes(nodes: impl IntoIterator<Item = N>) -> Self {
        Self {
            neighbors: nodes
                .into_iter()
                .map(|node| (node, BTreeSet::new()))
                .collect(),
        }
    }

    /// Adds a node without links. Existing nodes are left untouched.
    pub fn insert_node(&mut self, node: N) {
        let _ = self.neighbors.entry(node).or_default();
    }

    /// Adds an undirected link, inserting missing endpoints.
    pub fn insert_link(&mut self, a: N, b: N) {
        let _ = self.neighbors.entry(a).or_default().insert(b);
        let _ = self.neighbors.entry(b).or_default().insert(a);
    }

    /// Neighbours of the node in ascending order. Unknown nodes have none.
    pub fn neighbors(&self, node: N) -> impl Iterator<Item = N> + '_ {
        self.neighbors.get(&node).into_iter().flatten().copied()
    }

    /// Reports whether the node is part of the adjacency.
    #[must_use]
    pub fn contains_node(&self, node: N) -> bool {
        self.neighbors.contains_key(&node)
    }

    /// Reports whether the two nodes are linked.
    #[must_use]
    pub fn contains_link(&self, a: N, b: N) -> bool {
        self.neighbors
            .get(&a)
            .map_or(false, |neighbors| neighbors.contains(&b))
    }

    /// Iterates every node in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.neighbors.keys().copied()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of undirected links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.neighbors.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Reports whether every stored link is mirrored by its reverse.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.neighbors.iter().all(|(node, neighbors)| {
            neighbors
                .iter()
                .all(|neighbor| self.contains_link(*neighbor, *node))
        })
    }
}

/// Vertices placed on a grid together with the links between them.
#[derive(Clone, Debug, Default)]
pub struct Topology {
    coords: BTreeMap<VertexId, Coord>,
    vertices_by_coord: BTreeMap<Coord, VertexId>,
    links: BTreeSet<(VertexId, VertexId)>,
    adjacency: Adjacency<VertexId>,
}

impl Topology {
    /// Builds a topology by linking every pair of vertices at unit distance.
    ///
    /// The scan compares every pair of vertices, which is quadratic in the
    /// number of vertices but independent of the grid's shape. An empty
    /// mapping yields an empty topology.
    pub fn from_coordinates(coords: BTreeMap<VertexId, Coord>) -> Result<Self, GraphError> {
        let vertices_by_coord = index_coordinates(&coords)?;
        let mut links = BTreeSet::new();

        for (position, (&a, coord_a)) in coords.iter().enumerate() {
            for (&b, coord_b) in coords.iter().skip(position + 1) {
                if coord_a.squared_distance(*coord_b) == 1 {
                    let _ = links.insert(normalize(a, b));
                }
            }
        }

        Ok(Self::assemble(coords, vertices_by_coord, links))
    }

    /// Builds a topology from an explicit link set, skipping inference.
    pub fn with_edges(
        coords: BTreeMap<VertexId, Coord>,
        edges: impl IntoIterator<Item = (VertexId, VertexId)>,
    ) -> Result<Self, GraphError> {
        let vertices_by_coord = index_coordinates(&coords)?;
        let mut links = BTreeSet::new();

        for (a, b) in edges {
            if a == b {
                return Err(GraphError::SelfLoop(a));
            }
            for vertex in [a, b] {
                if !coords.contains_key(&vertex) {
                    return Err(GraphError::UnknownVertex(vertex));
                }
            }
            let _ = links.insert(normalize(a, b));
        }

        Ok(Self::assemble(coords, vertices_by_coord, links))
    }

    /// Builds the topology of every open cell in a grid.
    ///
    /// Vertex identifiers follow row-major numbering so the same cell always
    /// receives the same identifier regardless of the wall layout.
    #[must_use]
    pub fn from_open_cells(size: GridSize, walls: &BTreeSet<Coord>) -> Self {
        let mut coords = BTreeMap::new();
        let mut vertices_by_coord = BTreeMap::new();

        for coord in size.coords().filter(|coord| !walls.contains(coord)) {
            let vertex = size.row_major_id(coord);
            let _ = coords.insert(vertex, coord);
            let _ = vertices_by_coord.insert(coord, vertex);
        }

        let mut links = BTreeSet::new();
        for (&coord, &vertex) in &vertices_by_coord {
            let right = Coord::new(coord.row(), coord.column() + 1);
            let down = Coord::new(coord.row() + 1, coord.column());
            for neighbor in [right, down] {
                if let Some(&other) = vertices_by_coord.get(&neighbor) {
                    let _ = links.insert(normalize(vertex, other));
                }
            }
        }

        Self::assemble(coords, vertices_by_coord, links)
    }

    fn assemble(
        coords: BTreeMap<VertexId, Coord>,
        vertices_by_coord: BTreeMap<Coord, VertexId>,
        links: BTreeSet<(VertexId, VertexId)>,
    ) -> Self {
        let mut adjacency = Adjacency::with_nodes(coords.keys().copied());
        for &(a, b) in &links {
            adjacency.insert_link(a, b);
        }
        debug_assert!(adjacency.is_symmetric());
        debug_assert_eq!(adjacency.node_count(), coords.len());

        debug!(
            "topology built with {} vertices and {} links",
            coords.len(),
            links.len()
        );

        Self {
            coords,
            vertices_by_coord,
            links,
            adjacency,
        }
    }

    /// Fails with [`GraphError::EmptyInput`] when the topology has no vertex.
    pub fn require_vertices(&self) -> Result<(), GraphError> {
        if self.coords.is_empty() {
            Err(GraphError::EmptyInput)
        } else {
            Ok(())
        }
    }

    /// Coordinate of a vertex, failing for vertices outside the topology.
    pub fn require_vertex(&self, vertex: VertexId) -> Result<Coord, GraphError> {
        self.coord(vertex).ok_or(GraphError::UnknownVertex(vertex))
    }

    /// Coordinate of a vertex.
    #[must_use]
    pub fn coord(&self, vertex: VertexId) -> Option<Coord> {
        self.coords.get(&vertex).copied()
    }

    /// Vertex placed on the coordinate.
    #[must_use]
    pub fn vertex_at(&self, coord: Coord) -> Option<VertexId> {
        self.vertices_by_coord.get(&coord).copied()
    }

    /// Neighbours of a vertex in ascending identifier order.
    pub fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency.neighbors(vertex)
    }

    /// Reports whether the two vertices share a link.
    #[must_use]
    pub fn are_adjacent(&self, a: VertexId, b: VertexId) -> bool {
        self.adjacency.contains_link(a, b)
    }

    /// Iterates every vertex in ascending identifier order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.coords.keys().copied()
    }

    /// Iterates every vertex with its coordinate.
    pub fn placements(&self) -> impl Iterator<Item = (VertexId, Coord)> + '_ {
        self.coords.iter().map(|(&vertex, &coord)| (vertex, coord))
    }

    /// Iterates every link once, smaller identifier first.
    pub fn links(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.links.iter().copied()
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Reports whether the topology holds no vertex.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Derived vertex adjacency.
    #[must_use]
    pub fn adjacency(&self) -> &Adjacency<VertexId> {
        &self.adjacency
    }
}

fn index_coordinates(
    coords: &BTreeMap<VertexId, Coord>,
) -> Result<BTreeMap<Coord, VertexId>, GraphError> {
    let mut vertices_by_coord = BTreeMap::new();
    for (&vertex, &coord) in coords {
        if vertices_by_coord.insert(coord, vertex).is_some() {
            return Err(GraphError::DuplicateCoordinate(coord));
        }
    }
    Ok(vertices_by_coord)
}

fn normalize(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(columns: u32) -> BTreeMap<VertexId, Coord> {
        (0..columns)
            .map(|column| (VertexId::new(column), Coord::new(0, column)))
            .collect()
    }

    #[test]
    fn from_coordinates_links_unit_distance_pairs_only() {
        let mut coords = line(3);
        let _ = coords.insert(VertexId::new(7), Coord::new(1, 1));
        let topology = Topology::from_coordinates(coords).expect("valid coordinates");

        assert!(topology.are_adjacent(VertexId::new(0), VertexId::new(1)));
        assert!(topology.are_adjacent(VertexId::new(1), VertexId::new(7)));
        assert!(!topology.are_adjacent(VertexId::new(0), VertexId::new(7)));
        assert!(!topology.are_adjacent(VertexId::new(0), VertexId::new(2)));
        assert_eq!(topology.links().count(), 3);
        assert!(topology.adjacency().is_symmetric());
    }

    #[test]
    fn empty_mapping_produces_empty_topology() {
        let topology = Topology::from_coordinates(BTreeMap::new()).expect("empty is valid");
        assert!(topology.is_empty());
        assert_eq!(topology.require_vertices(), Err(GraphError::EmptyInput));
    }

    #[test]
    fn duplicate_coordinates_are_rejected() {
        let mut coords = line(2);
        let _ = coords.insert(VertexId::new(9), Coord::new(0, 1));
        assert_eq!(
            Topology::from_coordinates(coords).err(),
            Some(GraphError::DuplicateCoordinate(Coord::new(0, 1)))
        );
    }

    #[test]
    fn explicit_edges_reject_self_loops_and_unknown_vertices() {
        let self_loop = Topology::with_edges(line(2), [(VertexId::new(1), VertexId::new(1))]);
        assert_eq!(self_loop.err(), Some(GraphError::SelfLoop(VertexId::new(1))));

        let unknown = Topology::with_edges(line(2), [(VertexId::new(0), VertexId::new(5))]);
        assert_eq!(
            unknown.err(),
            Some(GraphError::UnknownVertex(VertexId::new(5)))
        );
    }

    #[test]
    fn explicit_edges_are_taken_verbatim() {
        let topology = Topology::with_edges(line(3), [(VertexId::new(2), VertexId::new(0))])
            .expect("valid edges");
        assert!(topology.are_adjacent(VertexId::new(0), VertexId::new(2)));
        assert!(!topology.are_adjacent(VertexId::new(0), VertexId::new(1)));
        assert_eq!(
            topology.links().collect::<Vec<_>>(),
            vec![(VertexId::new(0), VertexId::new(2))]
        );
        assert_eq!(topology.neighbors(VertexId::new(1)).count(), 0);
    }

    #[test]
    fn open_cells_match_pairwise_scan() {
        let size = GridSize::new(3, 4);
        let walls: BTreeSet<Coord> = [Coord::new(1, 1), Coord::new(0, 3)].into_iter().collect();
        let fast = Topology::from_open_cells(size, &walls);

        let coords = size
            .coords()
            .filter(|coord| !walls.contains(coord))
            .map(|coord| (size.row_major_id(coord), coord))
            .collect();
        let naive = Topology::from_coordinates(coords).expect("valid coordinates");

        assert_eq!(fast.links().collect::<Vec<_>>(), naive.links().collect::<Vec<_>>());
        assert_eq!(fast.adjacency(), naive.adjacency());
        assert_eq!(fast.vertex_at(Coord::new(2, 3)), Some(VertexId::new(11)));
        assert_eq!(fast.vertex_at(Coord::new(1, 1)), None);
    }

    #[test]
    fn adjacency_counts_links_once() {
        let mut adjacency = Adjacency::with_nodes([1_u32, 2, 3, 4]);
        adjacency.insert_link(1, 2);
        adjacency.insert_link(2, 3);
        adjacency.insert_link(3, 2);
        assert_eq!(adjacency.link_count(), 2);
        assert_eq!(adjacency.node_count(), 4);
        assert_eq!(adjacency.neighbors(4).count(), 0);
        assert_eq!(adjacency.neighbors(2).collect::<Vec<_>>(), vec![1, 3]);
    }
}
