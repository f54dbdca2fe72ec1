#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates, solves, chases and races through mazes.

mod config;
mod layout_transfer;

use std::{path::PathBuf, thread};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use maze_chase_core::{Coord, GridSize, Maze, Path, RoundStatus, VertexId};
use maze_chase_graph::Topology;
use maze_chase_rendering::{
    paint_endpoints, paint_event, paint_maze, paint_race, paint_walk, FrameBuffer, Palette,
    WalkStyle,
};
use maze_chase_system_generation::{GeneratorConfig, MazeGenerator};
use maze_chase_system_pursuit::{spawn_wall_clock, PursuitConfig, PursuitRound};
use maze_chase_system_solver::{
    caught_at, dfs_tour, race_path, reconstruct_walk, shortest_path,
};
use rand::{seq::IteratorRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{config::AppConfig, layout_transfer::MazeSnapshot};

#[derive(Debug, Parser)]
#[command(
    name = "maze-chase",
    version,
    about = "Grid maze generator, path solver and pursuit simulator"
)]
struct Cli {
    /// Seed for every random decision; drawn from the OS when omitted.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// TOML file overriding the generator and pursuit defaults.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the number of grid rows.
    #[arg(long, global = true)]
    rows: Option<u32>,

    /// Override the number of grid columns.
    #[arg(long, global = true)]
    columns: Option<u32>,

    /// Override the number of holes punched into the wall lattice.
    #[arg(long, global = true)]
    holes: Option<usize>,

    /// Use a maze exported by `generate` instead of generating one.
    #[arg(long, global = true, value_name = "LAYOUT")]
    layout: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a maze, print it and its layout string.
    Generate,
    /// Walk from the entrance to the exit.
    Solve {
        /// Search used to build the walk.
        #[arg(long, value_enum, default_value_t = Algorithm::Bfs)]
        algorithm: Algorithm,
        /// How the walk is drawn.
        #[arg(long, value_enum, default_value_t = Style::Trail)]
        style: Style,
    },
    /// Play pursuit rounds, one maze per round.
    Chase {
        /// Number of rounds to play.
        #[arg(long, default_value_t = 1)]
        rounds: u32,
        /// Pace moves at the configured tick and run wall-clock timers.
        #[arg(long)]
        realtime: bool,
    },
    /// Send a depth-first explorer to the exit with a breadth-first chaser
    /// on its heels.
    Race,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algorithm {
    /// Breadth-first shortest path.
    Bfs,
    /// Depth-first exploration walk including backtracking.
    Dfs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Style {
    /// Leave a trail behind the walker.
    Trail,
    /// Show only the walker.
    Dot,
}

impl From<Style> for WalkStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Trail => WalkStyle::Trail,
            Style::Dot => WalkStyle::Dot,
        }
    }
}

/// Entry point for the maze-chase command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let app_config = AppConfig::load(cli.config.as_deref())?;
    let generator_config = apply_overrides(app_config.generator_config(), &cli);
    let pursuit_config = app_config.pursuit_config();

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("using seed {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let palette = Palette::default();

    match cli.command {
        Command::Generate => {
            let maze = obtain_maze(cli.layout.as_deref(), &generator_config, &mut rng)?;
            let mut frame = FrameBuffer::new(maze.size())?;
            paint_maze(&mut frame, &maze, &palette)?;
            print!("{}", frame.to_ascii(&palette.walk_legend()));
            println!("{}", MazeSnapshot::from_maze(&maze).encode()?);
        }
        Command::Solve { algorithm, style } => {
            let maze = obtain_maze(cli.layout.as_deref(), &generator_config, &mut rng)?;
            solve(&maze, algorithm, style.into(), &palette)?;
        }
        Command::Chase { rounds, realtime } => {
            for round in 1..=rounds {
                let maze = obtain_maze(cli.layout.as_deref(), &generator_config, &mut rng)?;
                chase(round, &maze, pursuit_config, realtime, &palette, &mut rng)?;
            }
        }
        Command::Race => {
            let maze = obtain_maze(cli.layout.as_deref(), &generator_config, &mut rng)?;
            race(&maze, &palette, &mut rng)?;
        }
    }

    Ok(())
}

fn apply_overrides(mut config: GeneratorConfig, cli: &Cli) -> GeneratorConfig {
    config.size = GridSize::new(
        cli.rows.unwrap_or(config.size.rows()),
        cli.columns.unwrap_or(config.size.columns()),
    );
    if let Some(holes) = cli.holes {
        config.random_holes = holes;
    }
    config
}

fn obtain_maze(
    layout: Option<&str>,
    config: &GeneratorConfig,
    rng: &mut ChaCha8Rng,
) -> Result<Maze> {
    match layout {
        Some(layout) => {
            let snapshot = MazeSnapshot::decode(layout).context("failed to decode layout")?;
            Ok(snapshot.into_maze()?)
        }
        None => MazeGenerator::new(*config)
            .generate(rng)
            .context("maze generation failed"),
    }
}

fn opening_vertex(
    topology: &Topology,
    opening: Option<Coord>,
    name: &str,
) -> Result<VertexId> {
    let Some(coord) = opening else {
        bail!("maze has no {name}");
    };
    topology
        .vertex_at(coord)
        .with_context(|| format!("{name} at ({}, {}) is walled", coord.row(), coord.column()))
}

fn solve(maze: &Maze, algorithm: Algorithm, style: WalkStyle, palette: &Palette) -> Result<()> {
    let topology = Topology::from_open_cells(maze.size(), maze.walls());
    let start = opening_vertex(&topology, maze.entrance(), "entrance")?;
    let end = opening_vertex(&topology, maze.exit(), "exit")?;

    let walk: Path = match algorithm {
        Algorithm::Bfs => shortest_path(&topology, start, end)?,
        Algorithm::Dfs => reconstruct_walk(&dfs_tour(&topology, start)?, end)?,
    };
    info!("{algorithm:?} walk uses {} moves", walk.len());

    let mut frame = FrameBuffer::new(maze.size())?;
    paint_maze(&mut frame, maze, palette)?;
    paint_endpoints(&mut frame, &topology, maze.size(), start, end, palette)?;
    paint_walk(&mut frame, &topology, maze.size(), &walk, style, palette)?;
    print!("{}", frame.to_ascii(&palette.walk_legend()));
    println!("{algorithm:?}: {} moves", walk.len());
    Ok(())
}

fn chase(
    round_number: u32,
    maze: &Maze,
    config: PursuitConfig,
    realtime: bool,
    palette: &Palette,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    let size = maze.size();
    let topology = Topology::from_open_cells(size, maze.walls());
    let evader = opening_vertex(&topology, maze.entrance(), "entrance")?;
    let pursuer = topology
        .vertices()
        .choose(rng)
        .context("maze has no open cells")?;

    let mut frame = FrameBuffer::new(size)?;
    paint_maze(&mut frame, maze, palette)?;

    let mut round = PursuitRound::new(topology.clone(), pursuer, evader, config)?;
    let wall_clock = realtime.then(|| spawn_wall_clock(&config, round.signal_sender()));

    let mut events = Vec::new();
    loop {
        let before = round.ticks();
        let status = round.step(rng, &mut events);
        for event in events.drain(..) {
            paint_event(&mut frame, &topology, size, &event, palette)?;
        }

        if realtime {
            println!("{}", frame.to_ascii(&palette.chase_legend()));
            let moves = u32::try_from(round.ticks() - before).unwrap_or(u32::MAX);
            thread::sleep(config.tick_duration.saturating_mul(moves));
        }
        if status.is_terminal() {
            break;
        }
    }
    drop(wall_clock);

    if !realtime {
        print!("{}", frame.to_ascii(&palette.chase_legend()));
    }
    match round.status() {
        RoundStatus::Captured => println!(
            "round {round_number}: captured after {} ticks ({:?} simulated)",
            round.ticks(),
            round.elapsed()
        ),
        RoundStatus::Aborted => println!(
            "round {round_number}: aborted after {} ticks ({:?} simulated)",
            round.ticks(),
            round.elapsed()
        ),
        RoundStatus::Chasing => bail!("round {round_number} stopped while still chasing"),
    }
    Ok(())
}

fn race(maze: &Maze, palette: &Palette, rng: &mut ChaCha8Rng) -> Result<()> {
    let size = maze.size();
    let topology = Topology::from_open_cells(size, maze.walls());
    let start = opening_vertex(&topology, maze.entrance(), "entrance")?;
    let finish = opening_vertex(&topology, maze.exit(), "exit")?;
    let chaser_start = topology
        .vertices()
        .choose(rng)
        .context("maze has no open cells")?;

    let walk = reconstruct_walk(&dfs_tour(&topology, start)?, finish)?;
    let chaser = race_path(&topology, &walk, chaser_start)?;

    let mut frame = FrameBuffer::new(size)?;
    paint_maze(&mut frame, maze, palette)?;
    paint_endpoints(&mut frame, &topology, size, start, finish, palette)?;
    paint_race(&mut frame, &topology, size, &walk, &chaser, finish, palette)?;
    print!("{}", frame.to_ascii(&palette.race_legend()));

    match caught_at(&walk, chaser_start, &chaser) {
        Some(step) => println!(
            "race: caught at step {} of {} ({} chaser moves)",
            step + 1,
            walk.len(),
            chaser.len()
        ),
        None => println!(
            "race: explorer finished after {} moves ({} chaser moves)",
            walk.len(),
            chaser.len()
        ),
    }
    Ok(())
}
