#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Maze generation system.
//!
//! The generator draws a wall lattice, partitions the remaining open cells
//! into connected components, links the components through a meta-graph of
//! single-wall bridges, and carves the walls behind a spanning tree of that
//! meta-graph so every open cell becomes reachable. Entrance and exit
//! openings are carved into the left and right borders last.

pub mod carving;
pub mod layout;
pub mod meta_graph;
pub mod spanning;

use std::collections::BTreeSet;

use log::{debug, warn};
use maze_chase_core::{ComponentId, Coord, GraphError, GridSize, Maze};
use maze_chase_graph::{components_by_dfs, components_by_union_find, Components, Topology};
use rand::Rng;

use crate::{meta_graph::MetaGraph, spanning::dfs_tree};

/// Algorithm used to partition the open cells into components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PartitionStrategy {
    /// Repeated iterative depth-first search.
    #[default]
    DepthFirst,
    /// Disjoint-set forest over the topology links.
    UnionFind,
}

impl PartitionStrategy {
    /// Partitions the topology with the selected algorithm.
    #[must_use]
    pub fn partition(self, topology: &Topology) -> Components {
        match self {
            Self::DepthFirst => components_by_dfs(topology),
            Self::UnionFind => components_by_union_find(topology),
        }
    }
}

/// Tunables consumed by [`MazeGenerator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Dimensions of the generated maze.
    pub size: GridSize,
    /// Number of holes punched into the interior wall lines.
    pub random_holes: usize,
    /// Whether an opening is carved into the left border.
    pub carve_entrance: bool,
    /// Whether an opening is carved into the right border.
    pub carve_exit: bool,
    /// Layouts tried before giving up on a connected maze.
    pub max_attempts: u32,
    /// Component analysis used by the pipeline.
    pub partition: PartitionStrategy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size: GridSize::new(16, 16),
            random_holes: 8,
            carve_entrance: true,
            carve_exit: true,
            max_attempts: 16,
            partition: PartitionStrategy::DepthFirst,
        }
    }
}

/// Produces connected mazes from random wall layouts.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    config: GeneratorConfig,
}

impl MazeGenerator {
    /// Creates a generator using the supplied configuration.
    #[must_use]
    pub const fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Configuration the generator was created with.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Runs the full pipeline, retrying layouts that stay disconnected or
    /// cannot host the requested border openings.
    pub fn generate(&self, rng: &mut impl Rng) -> Result<Maze, GraphError> {
        self.generate_with(rng, |config, rng| layout::build_wall(config, rng))
    }

    fn generate_with<R, L>(&self, rng: &mut R, mut build_layout: L) -> Result<Maze, GraphError>
    where
        R: Rng,
        L: FnMut(&GeneratorConfig, &mut R) -> BTreeSet<Coord>,
    {
        let size = self.config.size;

        for attempt in 1..=self.config.max_attempts {
            let mut walls = build_layout(&self.config, rng);
            let topology = Topology::from_open_cells(size, &walls);
            let components = self.config.partition.partition(&topology);
            if components.is_empty() {
                warn!("attempt {attempt}: layout left no open cells");
                continue;
            }

            let meta = MetaGraph::build(&components, &topology);
            let tree = dfs_tree(meta.adjacency(), ComponentId::new(0));
            debug!(
                "attempt {attempt}: {} components, {} bridges, {} tree edges",
                components.len(),
                meta.bridge_count(),
                tree.len()
            );
            debug_assert!(tree.len() < components.len());

            let _ = carving::carve(&tree, &meta, &topology, &mut walls);

            let carved = Topology::from_open_cells(size, &walls);
            let remaining = self.config.partition.partition(&carved).len();
            if remaining != 1 {
                warn!("attempt {attempt}: carving left {remaining} components, regenerating");
                continue;
            }

            match self.carve_openings(&mut walls, rng) {
                Ok((entrance, exit)) => return Ok(Maze::new(size, walls, entrance, exit)),
                Err(error @ GraphError::CarvingExhausted { .. }) => {
                    warn!("attempt {attempt}: {error}, regenerating");
                }
                Err(error) => return Err(error),
            }
        }

        Err(GraphError::GenerationExhausted {
            attempts: self.config.max_attempts,
        })
    }

    fn carve_openings(
        &self,
        walls: &mut BTreeSet<Coord>,
        rng: &mut impl Rng,
    ) -> Result<(Option<Coord>, Option<Coord>), GraphError> {
        let size = self.config.size;
        let entrance = if self.config.carve_entrance {
            Some(carving::carve_entrance(walls, size, rng)?)
        } else {
            None
        };
        let exit = if self.config.carve_exit {
            Some(carving::carve_exit(walls, size, rng)?)
        } else {
            None
        };
        Ok((entrance, exit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn bordered(size: GridSize) -> BTreeSet<Coord> {
        size.coords().filter(|coord| size.is_border(*coord)).collect()
    }

    /// Border plus every interior cell except the centre, so neither inner
    /// column has an open cell next to the border.
    fn sealed_centre(size: GridSize) -> BTreeSet<Coord> {
        let centre = Coord::new(size.rows() / 2, size.columns() / 2);
        size.coords().filter(|coord| *coord != centre).collect()
    }

    fn five_by_five() -> MazeGenerator {
        MazeGenerator::new(GeneratorConfig {
            size: GridSize::new(5, 5),
            max_attempts: 3,
            ..GeneratorConfig::default()
        })
    }

    #[test]
    fn layouts_without_room_for_openings_are_regenerated() {
        let generator = five_by_five();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut layouts = 0;

        let maze = generator
            .generate_with(&mut rng, |config, _| {
                layouts += 1;
                if layouts == 1 {
                    sealed_centre(config.size)
                } else {
                    bordered(config.size)
                }
            })
            .expect("second layout hosts both openings");

        assert_eq!(layouts, 2);
        let entrance = maze.entrance().expect("entrance carved");
        let exit = maze.exit().expect("exit carved");
        assert_eq!(entrance.column(), 0);
        assert_eq!(exit.column(), 4);
        assert!(!maze.is_wall(entrance));
        assert!(!maze.is_wall(exit));
    }

    #[test]
    fn persistent_carving_failures_exhaust_generation() {
        let generator = five_by_five();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let result = generator.generate_with(&mut rng, |config, _| sealed_centre(config.size));

        assert_eq!(result, Err(GraphError::GenerationExhausted { attempts: 3 }));
    }
}
