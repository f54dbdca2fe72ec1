use std::collections::{BTreeMap, BTreeSet};

use maze_chase_core::{Coord, Edge, GraphError, Maze, VertexId};
use maze_chase_graph::Topology;
use maze_chase_system_generation::{GeneratorConfig, MazeGenerator};
use maze_chase_system_solver::{
    bfs_distances, caught_at, dfs_tour, race_path, reconstruct_path, reconstruct_walk,
    shortest_path,
};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn generated(seed: u64) -> (Maze, Topology) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let maze = MazeGenerator::new(GeneratorConfig::default())
        .generate(&mut rng)
        .expect("maze generated");
    let topology = Topology::from_open_cells(maze.size(), maze.walls());
    (maze, topology)
}

fn entrance_vertex(maze: &Maze, topology: &Topology) -> VertexId {
    let entrance = maze.entrance().expect("entrance carved");
    topology.vertex_at(entrance).expect("entrance is open")
}

#[test]
fn straight_row_yields_three_step_path() {
    let coords: BTreeMap<VertexId, Coord> = (0..4)
        .map(|column| (VertexId::new(column), Coord::new(0, column)))
        .collect();
    let topology = Topology::from_coordinates(coords).expect("valid coordinates");

    let path = shortest_path(&topology, VertexId::new(0), VertexId::new(3)).expect("reachable");
    let expected: Vec<Edge> = [(0, 1), (1, 2), (2, 3)]
        .into_iter()
        .map(|(from, to)| Edge::new(VertexId::new(from), VertexId::new(to)))
        .collect();

    assert_eq!(path.edges(), expected.as_slice());
}

#[test]
fn shortest_paths_match_breadth_first_distances() {
    for seed in 0..6 {
        let (maze, topology) = generated(seed);
        let start = entrance_vertex(&maze, &topology);
        let (distances, predecessors) = bfs_distances(&topology, start).expect("start exists");

        for end in topology.vertices() {
            let path = reconstruct_path(&predecessors, start, end).expect("maze is connected");
            let hops = distances.get(end).expect("reached");

            assert!(path.is_contiguous());
            assert_eq!(path.len(), hops as usize, "seed {seed} end {}", end.get());
            if let Some(first) = path.first_vertex() {
                assert_eq!(first, start);
                assert_eq!(path.last_vertex(), Some(end));
            }
            for edge in path.iter() {
                assert!(topology.are_adjacent(edge.from(), edge.to()));
            }
        }
    }
}

#[test]
fn disconnected_targets_report_unreachable() {
    let walls: BTreeSet<Coord> = (0..3).map(|row| Coord::new(row, 2)).collect();
    let topology =
        Topology::from_open_cells(maze_chase_core::GridSize::new(3, 5), &walls);
    let start = topology.vertex_at(Coord::new(1, 0)).expect("open");
    let end = topology.vertex_at(Coord::new(1, 4)).expect("open");

    assert_eq!(
        shortest_path(&topology, start, end),
        Err(GraphError::Unreachable { from: start, to: end })
    );
    let tour = dfs_tour(&topology, start).expect("start exists");
    assert_eq!(
        reconstruct_walk(&tour, end),
        Err(GraphError::Unreachable { from: start, to: end })
    );
}

#[test]
fn exploration_walks_are_contiguous_and_reach_their_target() {
    let mut picker = ChaCha8Rng::seed_from_u64(1234);

    for seed in 10..16 {
        let (maze, topology) = generated(seed);
        let start = entrance_vertex(&maze, &topology);
        let tour = dfs_tour(&topology, start).expect("start exists");
        assert_eq!(tour.order().len(), topology.len());

        let vertices: Vec<VertexId> = topology.vertices().collect();
        let targets: Vec<VertexId> = vertices.choose_multiple(&mut picker, 8).copied().collect();

        for end in targets {
            let walk = reconstruct_walk(&tour, end).expect("maze is connected");
            assert!(walk.is_contiguous(), "seed {seed}");
            if end == start {
                assert!(walk.is_empty());
            } else {
                assert_eq!(walk.first_vertex(), Some(start));
                assert_eq!(walk.last_vertex(), Some(end));
            }

            let mut traversals: BTreeMap<(VertexId, VertexId), usize> = BTreeMap::new();
            for edge in walk.iter() {
                assert!(topology.are_adjacent(edge.from(), edge.to()));
                let link = if edge.from() < edge.to() {
                    (edge.from(), edge.to())
                } else {
                    (edge.to(), edge.from())
                };
                *traversals.entry(link).or_default() += 1;
            }
            assert!(traversals.values().all(|&count| count <= 2));
        }
    }
}

#[test]
fn farthest_ranking_starts_with_the_maximum_distance() {
    let (maze, topology) = generated(3);
    let start = entrance_vertex(&maze, &topology);
    let (distances, _) = bfs_distances(&topology, start).expect("start exists");

    let ranked = distances.ranked_farthest();
    assert_eq!(ranked.len(), topology.len());
    assert_eq!(ranked.last(), Some(&start));
    let hops: Vec<u32> = ranked
        .iter()
        .map(|vertex| distances.get(*vertex).expect("ranked vertices are reached"))
        .collect();
    assert!(hops.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn chaser_advances_in_lockstep_toward_the_explorer() {
    let mut picker = ChaCha8Rng::seed_from_u64(77);

    for seed in 20..26 {
        let (maze, topology) = generated(seed);
        let start = entrance_vertex(&maze, &topology);
        let exit = topology
            .vertex_at(maze.exit().expect("exit carved"))
            .expect("exit is open");
        let walk = reconstruct_walk(&dfs_tour(&topology, start).expect("start exists"), exit)
            .expect("maze is connected");

        let vertices: Vec<VertexId> = topology.vertices().collect();
        let chaser_start = *vertices.choose(&mut picker).expect("open cells");
        let chaser = race_path(&topology, &walk, chaser_start).expect("maze is connected");

        assert!(walk.is_contiguous());
        assert!(chaser.is_contiguous());
        assert!(chaser.len() <= walk.len(), "seed {seed}");
        if let Some(first) = chaser.first_vertex() {
            assert_eq!(first, chaser_start);
        }

        for (step, walker_edge) in chaser.iter().zip(walk.iter()) {
            let (distances, _) =
                bfs_distances(&topology, walker_edge.from()).expect("walker is on the maze");
            let before = distances.get(step.from()).expect("connected");
            let after = distances.get(step.to()).expect("connected");
            assert_eq!(after + 1, before, "seed {seed}");
        }

        if let Some(index) = caught_at(&walk, chaser_start, &chaser) {
            assert!(index <= chaser.len());
        } else {
            assert_eq!(chaser.len(), walk.len(), "seed {seed}");
        }
    }
}
