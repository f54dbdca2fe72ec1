#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Two-agent pursuit simulation on a grid topology.
//!
//! A [`PursuitRound`] moves a pursuer along breadth-first shortest paths
//! toward an evader while the evader keeps choosing distant targets whose
//! paths do not collide with the pursuer's plan. Every cycle the pursuer
//! re-plans, except that after a configurable number of cycles its plan is
//! dropped for one cycle so the evader can slip away. Timers reach the round
//! through a [`RoundSignal`] inbox that is drained once per step.

pub mod watchdog;

use std::{
    mem,
    sync::mpsc::{self, Receiver, Sender},
    time::Duration,
};

use log::{debug, info};
use maze_chase_core::{Agent, GraphError, Path, PursuitEvent, RoundStatus, VertexId};
use maze_chase_graph::Topology;
use maze_chase_system_solver::{bfs_distances, reconstruct_path, shortest_path};
use rand::Rng;

pub use watchdog::{spawn_wall_clock, RoundSignal, WallClock, Watchdog};

/// Tunables consumed by [`PursuitRound`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuitConfig {
    /// Cycles the pursuer re-plans before its plan is dropped for one cycle.
    pub cycle_budget: u32,
    /// Upper bound of the evader's random candidate offset at round start.
    pub initial_limit_index: usize,
    /// Upper bound applied once the widen deadline passes.
    pub widened_limit_index: usize,
    /// Simulated time after which the candidate window widens.
    pub widen_after: Duration,
    /// Simulated time after which the round aborts.
    pub abort_after: Duration,
    /// Simulated duration of a single move.
    pub tick_duration: Duration,
    /// The evader's ranking narrows to `1 / near_fraction` of its entries.
    pub near_fraction: usize,
    /// Pursuer plans shorter than this narrow the evader's ranking.
    pub near_threshold: usize,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            cycle_budget: 8,
            initial_limit_index: 5,
            widened_limit_index: 15,
            widen_after: Duration::from_secs(60),
            abort_after: Duration::from_secs(240),
            tick_duration: Duration::from_millis(40),
            near_fraction: 10,
            near_threshold: 3,
        }
    }
}

/// Reports whether two plans would meet when followed in lockstep.
///
/// Plans meet when both agents enter the same vertex on the same step or
/// swap places along the same edge.
#[must_use]
pub fn collides(first: &Path, second: &Path) -> bool {
    first.iter().zip(second.iter()).any(|(a, b)| {
        a.to() == b.to() || (a.from() == b.to() && a.to() == b.from())
    })
}

/// State of a single pursuit round.
#[derive(Debug)]
pub struct PursuitRound {
    topology: Topology,
    config: PursuitConfig,
    pursuer: VertexId,
    evader: VertexId,
    pursuer_path: Path,
    evader_path: Path,
    previous_pursuer_path: Path,
    cycle: u32,
    limit_index: usize,
    status: RoundStatus,
    ticks: u64,
    watchdog: Watchdog,
    sender: Sender<RoundSignal>,
    inbox: Receiver<RoundSignal>,
}

impl PursuitRound {
    /// Starts a round with both agents placed on the topology.
    pub fn new(
        topology: Topology,
        pursuer: VertexId,
        evader: VertexId,
        config: PursuitConfig,
    ) -> Result<Self, GraphError> {
        let _ = topology.require_vertex(pursuer)?;
        let _ = topology.require_vertex(evader)?;
        let (sender, inbox) = mpsc::channel();

        Ok(Self {
            topology,
            config,
            pursuer,
            evader,
            pursuer_path: Path::default(),
            evader_path: Path::default(),
            previous_pursuer_path: Path::default(),
            cycle: 0,
            limit_index: config.initial_limit_index,
            status: RoundStatus::Chasing,
            ticks: 0,
            watchdog: Watchdog::new(&config),
            sender,
            inbox,
        })
    }

    /// Handle that external timers use to post signals to the round.
    #[must_use]
    pub fn signal_sender(&self) -> Sender<RoundSignal> {
        self.sender.clone()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> RoundStatus {
        self.status
    }

    /// Current `(pursuer, evader)` positions.
    #[must_use]
    pub const fn positions(&self) -> (VertexId, VertexId) {
        (self.pursuer, self.evader)
    }

    /// Moves performed so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time elapsed in the round.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        let ticks = u32::try_from(self.ticks).unwrap_or(u32::MAX);
        self.config.tick_duration.saturating_mul(ticks)
    }

    /// Current upper bound of the evader's random candidate offset.
    #[must_use]
    pub const fn limit_index(&self) -> usize {
        self.limit_index
    }

    /// Pursuer plan computed in the latest cycle.
    #[must_use]
    pub fn pursuer_path(&self) -> &Path {
        &self.pursuer_path
    }

    /// Evader plan selected in the latest cycle.
    #[must_use]
    pub fn evader_path(&self) -> &Path {
        &self.evader_path
    }

    /// Topology the round is played on.
    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Advances the round by one planning cycle.
    ///
    /// Events describing every move are appended to `out`. Terminal rounds
    /// are left untouched.
    pub fn step(&mut self, rng: &mut impl Rng, out: &mut Vec<PursuitEvent>) -> RoundStatus {
        if self.status.is_terminal() {
            return self.status;
        }

        self.drain_signals(out);
        if self.status.is_terminal() {
            return self.status;
        }

        if self.pursuer == self.evader {
            self.capture(out);
            return self.status;
        }

        self.cycle += 1;
        if self.cycle > self.config.cycle_budget {
            self.previous_pursuer_path = mem::take(&mut self.pursuer_path);
            self.cycle = 0;
        } else {
            self.pursuer_path = self.plan_pursuit();
        }

        self.evader_path = self.select_escape(&self.pursuer_path, rng);

        if !self.evader_path.is_empty() && !self.pursuer_path.is_empty() {
            self.advance_lockstep(out);
        } else if !self.pursuer_path.is_empty() {
            self.pursuer_path = self.plan_pursuit();
            let plan = self.pursuer_path.clone();
            self.advance_alone(Agent::Pursuer, &plan, out);
        } else {
            self.evader_path = self.select_escape(&self.previous_pursuer_path, rng);
            if self.evader_path.is_empty() {
                out.push(PursuitEvent::AgentTeleported {
                    agent: Agent::Evader,
                    from: self.evader,
                    to: self.pursuer,
                });
                self.evader = self.pursuer;
            } else {
                let plan = self.evader_path.clone();
                self.advance_alone(Agent::Evader, &plan, out);
            }
        }

        if self.pursuer == self.evader {
            self.capture(out);
        }
        self.status
    }

    /// Steps until the round reaches a terminal status.
    pub fn run(&mut self, rng: &mut impl Rng, out: &mut Vec<PursuitEvent>) -> RoundStatus {
        while !self.step(rng, out).is_terminal() {}
        self.status
    }

    fn drain_signals(&mut self, out: &mut Vec<PursuitEvent>) {
        let elapsed = self.elapsed();
        self.watchdog.poll(elapsed, &self.sender);

        while let Ok(signal) = self.inbox.try_recv() {
            match signal {
                RoundSignal::WidenWindow { limit_index } => {
                    self.limit_index = limit_index;
                    out.push(PursuitEvent::WindowWidened { limit_index });
                }
                RoundSignal::Abort => {
                    self.status = RoundStatus::Aborted;
                    out.push(PursuitEvent::Aborted { ticks: self.ticks });
                    info!("round aborted after {} ticks", self.ticks);
                    return;
                }
            }
        }
    }

    fn capture(&mut self, out: &mut Vec<PursuitEvent>) {
        self.status = RoundStatus::Captured;
        out.push(PursuitEvent::Captured {
            at: self.pursuer,
            ticks: self.ticks,
        });
        info!(
            "evader captured at vertex {} after {} ticks",
            self.pursuer.get(),
            self.ticks
        );
    }

    fn plan_pursuit(&self) -> Path {
        match shortest_path(&self.topology, self.pursuer, self.evader) {
            Ok(path) => path,
            Err(error) => {
                debug!("pursuer has no plan: {error}");
                Path::default()
            }
        }
    }

    fn select_escape(&self, against: &Path, rng: &mut impl Rng) -> Path {
        let start = self.evader;
        let Ok((distances, predecessors)) = bfs_distances(&self.topology, start) else {
            return Path::default();
        };

        let mut ranked = distances.ranked_farthest();
        let near = ranked.len() / self.config.near_fraction.max(1);
        if against.len() < self.config.near_threshold && near > 0 {
            ranked = ranked.split_off(ranked.len() - near);
        }

        let offset = rng.gen_range(0..=self.limit_index);
        ranked
            .into_iter()
            .skip(offset)
            .filter(|&target| target != start)
            .filter_map(|target| reconstruct_path(&predecessors, start, target).ok())
            .find(|path| !collides(path, against))
            .unwrap_or_default()
    }

    fn advance_lockstep(&mut self, out: &mut Vec<PursuitEvent>) {
        let moves: Vec<_> = self
            .evader_path
            .iter()
            .zip(self.pursuer_path.iter())
            .map(|(evader, pursuer)| (*evader, *pursuer))
            .collect();

        for (evader, pursuer) in moves {
            self.evader = evader.to();
            self.pursuer = pursuer.to();
            self.ticks += 1;
            out.push(PursuitEvent::AgentMoved {
                agent: Agent::Evader,
                from: evader.from(),
                to: evader.to(),
            });
            out.push(PursuitEvent::AgentMoved {
                agent: Agent::Pursuer,
                from: pursuer.from(),
                to: pursuer.to(),
            });
            if self.evader == self.pursuer {
                break;
            }
        }
    }

    fn advance_alone(&mut self, agent: Agent, plan: &Path, out: &mut Vec<PursuitEvent>) {
        for edge in plan.iter() {
            match agent {
                Agent::Pursuer => self.pursuer = edge.to(),
                Agent::Evader => self.evader = edge.to(),
            }
            self.ticks += 1;
            out.push(PursuitEvent::AgentMoved {
                agent,
                from: edge.from(),
                to: edge.to(),
            });
            if self.evader == self.pursuer {
                break;
            }
        }
    }
}
