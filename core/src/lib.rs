#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze-chase engine.
//!
//! This crate defines the vocabulary that connects the graph engine, the
//! generation, solver and pursuit systems, and the adapters. Systems build
//! [`Maze`] values and [`Path`] values out of [`VertexId`] and [`Coord`]
//! pairs, the pursuit system broadcasts [`PursuitEvent`] values, and every
//! fallible operation reports a [`GraphError`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier assigned to a grid vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(u32);

impl VertexId {
    /// Creates a new vertex identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier assigned to a connected component of a topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    /// Creates a new component identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    row: u32,
    column: u32,
}

impl Coord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Squared Euclidean distance between two coordinates.
    ///
    /// Orthogonal neighbours are at distance 1, diagonal neighbours at 2 and
    /// cells separated by a single cell along a row or column at 4.
    #[must_use]
    pub fn squared_distance(self, other: Coord) -> u32 {
        let rows = self.row.abs_diff(other.row);
        let columns = self.column.abs_diff(other.column);
        rows * rows + columns * columns
    }
}

/// Dimensions of a rectangular grid measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    rows: u32,
    columns: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells covered by the grid.
    #[must_use]
    pub const fn cell_count(&self) -> u32 {
        self.rows * self.columns
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.row() < self.rows && coord.column() < self.columns
    }

    /// Reports whether the coordinate lies on the outermost ring of the grid.
    #[must_use]
    pub const fn is_border(&self, coord: Coord) -> bool {
        self.contains(coord)
            && (coord.row() == 0
                || coord.column() == 0
                || coord.row() + 1 == self.rows
                || coord.column() + 1 == self.columns)
    }

    /// Row-major vertex identifier of the coordinate.
    #[must_use]
    pub const fn row_major_id(&self, coord: Coord) -> VertexId {
        VertexId::new(coord.row() * self.columns + coord.column())
    }

    /// Iterates every cell of the grid in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| Coord::new(row, column)))
    }
}

/// Directed traversal between two vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    from: VertexId,
    to: VertexId,
}

impl Edge {
    /// Creates a directed edge leaving `from` and entering `to`.
    #[must_use]
    pub const fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }

    /// Vertex the edge leaves.
    #[must_use]
    pub const fn from(&self) -> VertexId {
        self.from
    }

    /// Vertex the edge enters.
    #[must_use]
    pub const fn to(&self) -> VertexId {
        self.to
    }

    /// Same link walked in the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }

    /// Reports whether both edges connect the same pair of vertices.
    #[must_use]
    pub fn same_link(self, other: Edge) -> bool {
        self == other || self == other.reversed()
    }
}

/// Ordered walk expressed as directed edges.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    edges: Vec<Edge>,
}

impl Path {
    /// Creates a path from the provided edges.
    #[must_use]
    pub fn new(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    /// Edges of the walk in traversal order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of edges in the walk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Reports whether the walk contains no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Vertex the walk starts from, if it has any edge.
    #[must_use]
    pub fn first_vertex(&self) -> Option<VertexId> {
        self.edges.first().map(|edge| edge.from())
    }

    /// Vertex the walk ends on, if it has any edge.
    #[must_use]
    pub fn last_vertex(&self) -> Option<VertexId> {
        self.edges.last().map(|edge| edge.to())
    }

    /// Reports whether each edge starts where the previous one ended.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.edges
            .windows(2)
            .all(|pair| pair[0].to() == pair[1].from())
    }

    /// Vertices visited by the walk, starting vertex included.
    #[must_use]
    pub fn vertices(&self) -> Vec<VertexId> {
        let mut vertices = Vec::with_capacity(self.edges.len() + 1);
        if let Some(first) = self.first_vertex() {
            vertices.push(first);
        }
        vertices.extend(self.edges.iter().map(|edge| edge.to()));
        vertices
    }

    /// Appends an edge to the end of the walk.
    pub fn push(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Iterator over the edges in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Consumes the path, yielding the underlying edges.
    #[must_use]
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}

impl From<Vec<Edge>> for Path {
    fn from(edges: Vec<Edge>) -> Self {
        Self::new(edges)
    }
}

/// Border of the grid an opening is carved into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BorderSide {
    /// Column zero, used for the entrance.
    Left,
    /// Last column, used for the exit.
    Right,
}

/// Blocked cells of a grid plus the openings carved into its border.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    size: GridSize,
    walls: BTreeSet<Coord>,
    entrance: Option<Coord>,
    exit: Option<Coord>,
}

impl Maze {
    /// Creates a maze from its wall set and optional openings.
    #[must_use]
    pub fn new(
        size: GridSize,
        walls: BTreeSet<Coord>,
        entrance: Option<Coord>,
        exit: Option<Coord>,
    ) -> Self {
        Self {
            size,
            walls,
            entrance,
            exit,
        }
    }

    /// Dimensions of the maze grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Cells blocked by the wall.
    #[must_use]
    pub fn walls(&self) -> &BTreeSet<Coord> {
        &self.walls
    }

    /// Reports whether the cell is blocked.
    #[must_use]
    pub fn is_wall(&self, coord: Coord) -> bool {
        self.walls.contains(&coord)
    }

    /// Open cell on the left border, if one was carved.
    #[must_use]
    pub const fn entrance(&self) -> Option<Coord> {
        self.entrance
    }

    /// Open cell on the right border, if one was carved.
    #[must_use]
    pub const fn exit(&self) -> Option<Coord> {
        self.exit
    }

    /// Iterates every open cell in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.size.coords().filter(|coord| !self.walls.contains(coord))
    }
}

/// Participants of a pursuit round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Agent {
    /// Agent that follows shortest paths toward the evader.
    Pursuer,
    /// Agent that flees toward distant cells avoiding the pursuer's plan.
    Evader,
}

/// Lifecycle state of a pursuit round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundStatus {
    /// Both agents are still moving.
    Chasing,
    /// Both agents occupy the same vertex.
    Captured,
    /// The round was stopped by its watchdog.
    Aborted,
}

impl RoundStatus {
    /// Reports whether the round can no longer change state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Chasing)
    }
}

/// Events broadcast by the pursuit simulator while a round progresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PursuitEvent {
    /// An agent advanced along a single edge.
    AgentMoved {
        /// Agent that moved.
        agent: Agent,
        /// Vertex occupied before the move.
        from: VertexId,
        /// Vertex occupied after the move.
        to: VertexId,
    },
    /// An agent was lifted off the board and placed elsewhere.
    AgentTeleported {
        /// Agent that was relocated.
        agent: Agent,
        /// Vertex the agent was removed from.
        from: VertexId,
        /// Vertex the agent was placed on.
        to: VertexId,
    },
    /// The evader's candidate window was enlarged.
    WindowWidened {
        /// New upper bound of the random candidate offset.
        limit_index: usize,
    },
    /// The pursuer reached the evader.
    Captured {
        /// Vertex shared by both agents.
        at: VertexId,
        /// Ticks elapsed in the round.
        ticks: u64,
    },
    /// The round was stopped before a capture.
    Aborted {
        /// Ticks elapsed in the round.
        ticks: u64,
    },
}

/// Failures reported by the graph engine and the systems built on it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The target vertex is not connected to the source.
    #[error("vertex {} is unreachable from vertex {}", to.get(), from.get())]
    Unreachable {
        /// Vertex the search started from.
        from: VertexId,
        /// Vertex that could not be reached.
        to: VertexId,
    },
    /// The topology holds no vertex although the caller requires one.
    #[error("topology contains no vertices")]
    EmptyInput,
    /// No interior row admits an opening on the requested border.
    #[error("no interior row can host an opening on the {side:?} border")]
    CarvingExhausted {
        /// Border that could not be opened.
        side: BorderSide,
    },
    /// The vertex is not part of the topology.
    #[error("vertex {} is not part of the topology", .0.get())]
    UnknownVertex(VertexId),
    /// An explicit edge connects a vertex to itself.
    #[error("edge connects vertex {} to itself", .0.get())]
    SelfLoop(VertexId),
    /// Two vertices share the same coordinate.
    #[error("coordinate ({}, {}) is assigned to more than one vertex", .0.row(), .0.column())]
    DuplicateCoordinate(Coord),
    /// Every generation attempt produced a disconnected maze.
    #[error("maze generation failed after {attempts} attempts")]
    GenerationExhausted {
        /// Number of attempts performed.
        attempts: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{Coord, Edge, GridSize, Path, VertexId};

    fn edge(from: u32, to: u32) -> Edge {
        Edge::new(VertexId::new(from), VertexId::new(to))
    }

    #[test]
    fn squared_distance_matches_expectation() {
        let origin = Coord::new(1, 1);
        assert_eq!(origin.squared_distance(Coord::new(1, 2)), 1);
        assert_eq!(origin.squared_distance(Coord::new(2, 2)), 2);
        assert_eq!(origin.squared_distance(Coord::new(1, 3)), 4);
        assert_eq!(Coord::new(3, 1).squared_distance(origin), 4);
        assert_eq!(origin.squared_distance(origin), 0);
    }

    #[test]
    fn coord_round_trips_through_bincode() {
        let coord = Coord::new(5, 7);
        let bytes = bincode::serialize(&coord).expect("serialize");
        let restored: Coord = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, coord);
    }

    #[test]
    fn grid_size_reports_border_cells() {
        let size = GridSize::new(4, 5);
        assert!(size.is_border(Coord::new(0, 2)));
        assert!(size.is_border(Coord::new(3, 2)));
        assert!(size.is_border(Coord::new(2, 4)));
        assert!(!size.is_border(Coord::new(2, 2)));
        assert!(!size.is_border(Coord::new(4, 0)));
        assert_eq!(size.coords().count(), 20);
        assert_eq!(size.row_major_id(Coord::new(2, 3)), VertexId::new(13));
    }

    #[test]
    fn path_detects_discontinuity() {
        let contiguous = Path::new(vec![edge(0, 1), edge(1, 2), edge(2, 1)]);
        assert!(contiguous.is_contiguous());
        assert_eq!(
            contiguous.vertices(),
            vec![
                VertexId::new(0),
                VertexId::new(1),
                VertexId::new(2),
                VertexId::new(1)
            ]
        );

        let broken = Path::new(vec![edge(0, 1), edge(2, 3)]);
        assert!(!broken.is_contiguous());
    }

    #[test]
    fn empty_path_has_no_endpoints() {
        let path = Path::default();
        assert!(path.is_contiguous());
        assert!(path.first_vertex().is_none());
        assert!(path.vertices().is_empty());
    }

    #[test]
    fn same_link_ignores_direction() {
        assert!(edge(3, 4).same_link(edge(4, 3)));
        assert!(edge(3, 4).same_link(edge(3, 4)));
        assert!(!edge(3, 4).same_link(edge(3, 5)));
    }
}
