#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Path solvers over a grid [`Topology`](maze_chase_graph::Topology).
//!
//! [`bfs`] computes shortest paths and distance rankings from predecessor
//! chains. [`dfs`] records a depth-first exploration tour and turns it into a
//! contiguous walk by splicing in the backtracking moves. [`race`] sets a
//! breadth-first chaser after such a walk, one step per walker step.

pub mod bfs;
pub mod dfs;
pub mod race;

pub use bfs::{
    bfs_distances, bfs_traversal, reconstruct_path, shortest_path, Distances, Predecessors,
};
pub use dfs::{dfs_tour, reconstruct_walk, Tour};
pub use race::{caught_at, race_path};
