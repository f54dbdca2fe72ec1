use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use maze_chase_core::{PursuitEvent, RoundStatus, VertexId};
use maze_chase_graph::Topology;
use maze_chase_system_generation::{GeneratorConfig, MazeGenerator};
use maze_chase_system_pursuit::{PursuitConfig, PursuitRound};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn deterministic_replay_produces_identical_rounds() {
    let first = replay(0x00c0_ffee);
    let second = replay(0x00c0_ffee);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(matches!(
        first.status,
        RoundStatus::Captured | RoundStatus::Aborted
    ));
}

#[test]
fn different_seeds_diverge() {
    let fingerprints: Vec<u64> = (1..=4).map(|seed| replay(seed).fingerprint()).collect();
    assert!(
        fingerprints.windows(2).any(|pair| pair[0] != pair[1]),
        "all seeds replayed identically"
    );
}

fn replay(seed: u64) -> ReplayOutcome {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let maze = MazeGenerator::new(GeneratorConfig::default())
        .generate(&mut rng)
        .expect("maze generated");
    let topology = Topology::from_open_cells(maze.size(), maze.walls());

    let evader = maze
        .entrance()
        .and_then(|coord| topology.vertex_at(coord))
        .expect("entrance is open");
    let pursuer = maze
        .exit()
        .and_then(|coord| topology.vertex_at(coord))
        .expect("exit is open");

    let mut round = PursuitRound::new(topology, pursuer, evader, PursuitConfig::default())
        .expect("round created");
    let mut events = Vec::new();
    let status = round.run(&mut rng, &mut events);

    ReplayOutcome {
        status,
        positions: round.positions(),
        events,
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    status: RoundStatus,
    positions: (VertexId, VertexId),
    events: Vec<PursuitEvent>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
