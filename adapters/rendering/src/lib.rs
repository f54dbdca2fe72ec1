#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for maze-chase adapters.
//!
//! Output devices are modelled as a strip of addressable LEDs laid out in a
//! serpentine over the grid. Adapters implement [`LedSink`]; the painting
//! helpers in this crate translate mazes, walks and pursuit events into pixel
//! updates followed by a flush.

use std::{collections::BTreeSet, error::Error, fmt};

use anyhow::Result as AnyResult;
use maze_chase_core::{Agent, Coord, Edge, GridSize, Maze, Path, PursuitEvent, VertexId};
use maze_chase_graph::Topology;

/// Byte RGB color sent to an LED.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel intensity.
    pub red: u8,
    /// Green channel intensity.
    pub green: u8,
    /// Blue channel intensity.
    pub blue: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Unlit LED.
    pub const OFF: Self = Self::new(0, 0, 0);
}

/// Colors assigned to every kind of painted element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Cleared cells.
    pub background: Rgb,
    /// Wall cells.
    pub wall: Rgb,
    /// Cells a walk entered for the first time.
    pub trail: Rgb,
    /// Cells a walk left while backtracking.
    pub backtrack: Rgb,
    /// Final cell of a walk.
    pub target: Rgb,
    /// Starting cell of a walk.
    pub start: Rgb,
    /// Requested destination of a walk.
    pub destination: Rgb,
    /// Pursuer position.
    pub pursuer: Rgb,
    /// Evader position.
    pub evader: Rgb,
    /// Explorer cell once it reaches the finish ahead of its chaser.
    pub finish: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb::OFF,
            wall: Rgb::new(18, 4, 0),
            trail: Rgb::new(0, 24, 0),
            backtrack: Rgb::new(0, 1, 0),
            target: Rgb::new(24, 0, 0),
            start: Rgb::new(6, 10, 0),
            destination: Rgb::new(0, 0, 16),
            pursuer: Rgb::new(0, 24, 0),
            evader: Rgb::new(24, 0, 0),
            finish: Rgb::new(8, 0, 8),
        }
    }
}

impl Palette {
    /// Glyphs used when dumping a maze or walk as text.
    #[must_use]
    pub fn walk_legend(&self) -> Vec<(Rgb, char)> {
        vec![
            (self.background, '.'),
            (self.wall, '#'),
            (self.target, '*'),
            (self.start, 'S'),
            (self.destination, 'X'),
            (self.trail, 'o'),
            (self.backtrack, '-'),
        ]
    }

    /// Glyphs used when dumping an explorer and chaser race as text.
    #[must_use]
    pub fn race_legend(&self) -> Vec<(Rgb, char)> {
        vec![
            (self.background, '.'),
            (self.wall, '#'),
            (self.start, 'S'),
            (self.destination, 'X'),
            (self.trail, 'W'),
            (self.target, 'C'),
            (self.finish, '!'),
        ]
    }

    /// Glyphs used when dumping a pursuit frame as text.
    #[must_use]
    pub fn chase_legend(&self) -> Vec<(Rgb, char)> {
        vec![
            (self.background, '.'),
            (self.wall, '#'),
            (self.pursuer, 'P'),
            (self.evader, 'E'),
        ]
    }
}

/// Addressable LED strip.
pub trait LedSink {
    /// Number of addressable LEDs.
    fn len(&self) -> usize;

    /// Reports whether the strip has no LED.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Color currently buffered for the LED.
    fn get(&self, index: usize) -> Option<Rgb>;

    /// Buffers a color for the LED without displaying it.
    fn set(&mut self, index: usize, color: Rgb) -> Result<(), RenderingError>;

    /// Pushes every buffered color to the device.
    fn flush(&mut self) -> AnyResult<()>;
}

/// Strip index of a grid cell.
///
/// Even rows run right to left and odd rows left to right, matching a panel
/// wired as a single serpentine strip.
#[must_use]
pub fn serpentine_index(size: GridSize, coord: Coord) -> usize {
    let width = size.columns() as usize;
    let row = coord.row() as usize;
    let column = coord.column() as usize;

    if row % 2 == 1 {
        row * width + column
    } else {
        row * width + (width - 1 - column)
    }
}

/// In-memory LED strip used by terminal adapters and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    size: GridSize,
    pixels: Vec<Rgb>,
    flushes: usize,
}

impl FrameBuffer {
    /// Creates a dark buffer covering the grid.
    pub fn new(size: GridSize) -> Result<Self, RenderingError> {
        if size.cell_count() == 0 {
            return Err(RenderingError::EmptyGrid {
                rows: size.rows(),
                columns: size.columns(),
            });
        }

        Ok(Self {
            size,
            pixels: vec![Rgb::OFF; size.cell_count() as usize],
            flushes: 0,
        })
    }

    /// Grid dimensions covered by the buffer.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Number of completed flushes.
    #[must_use]
    pub const fn flushes(&self) -> usize {
        self.flushes
    }

    /// Color buffered for a grid cell.
    #[must_use]
    pub fn pixel(&self, coord: Coord) -> Option<Rgb> {
        if !self.size.contains(coord) {
            return None;
        }
        self.get(serpentine_index(self.size, coord))
    }

    /// Renders the buffer row by row using the first matching glyph.
    ///
    /// Colors missing from the legend are shown as `?`.
    #[must_use]
    pub fn to_ascii(&self, legend: &[(Rgb, char)]) -> String {
        let mut text = String::with_capacity(self.pixels.len() + self.size.rows() as usize);
        for row in 0..self.size.rows() {
            for column in 0..self.size.columns() {
                let color = self.pixel(Coord::new(row, column)).unwrap_or_default();
                let glyph = legend
                    .iter()
                    .find(|(candidate, _)| *candidate == color)
                    .map_or('?', |(_, glyph)| *glyph);
                text.push(glyph);
            }
            text.push('\n');
        }
        text
    }
}

impl LedSink for FrameBuffer {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn get(&self, index: usize) -> Option<Rgb> {
        self.pixels.get(index).copied()
    }

    fn set(&mut self, index: usize, color: Rgb) -> Result<(), RenderingError> {
        let len = self.pixels.len();
        let pixel = self
            .pixels
            .get_mut(index)
            .ok_or(RenderingError::IndexOutOfRange { index, len })?;
        *pixel = color;
        Ok(())
    }

    fn flush(&mut self) -> AnyResult<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// How a walk is animated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WalkStyle {
    /// Leave a trail: bright on the way out, dim when backtracking.
    #[default]
    Trail,
    /// Move a single dot along the walk.
    Dot,
}

/// Clears the strip and paints every wall cell.
pub fn paint_maze(sink: &mut impl LedSink, maze: &Maze, palette: &Palette) -> AnyResult<()> {
    let size = maze.size();
    for coord in size.coords() {
        let color = if maze.is_wall(coord) {
            palette.wall
        } else {
            palette.background
        };
        sink.set(serpentine_index(size, coord), color)?;
    }
    sink.flush()
}

/// Marks the start and the requested destination of a walk.
pub fn paint_endpoints(
    sink: &mut impl LedSink,
    topology: &Topology,
    size: GridSize,
    start: VertexId,
    destination: VertexId,
    palette: &Palette,
) -> AnyResult<()> {
    sink.set(led(topology, size, start)?, palette.start)?;
    sink.set(led(topology, size, destination)?, palette.destination)?;
    sink.flush()
}

/// Animates a walk, flushing once per edge, and marks its final cell.
pub fn paint_walk(
    sink: &mut impl LedSink,
    topology: &Topology,
    size: GridSize,
    walk: &Path,
    style: WalkStyle,
    palette: &Palette,
) -> AnyResult<()> {
    let mut returning: BTreeSet<Edge> = BTreeSet::new();

    for &edge in walk.iter() {
        let from = led(topology, size, edge.from())?;
        let to = led(topology, size, edge.to())?;
        match style {
            WalkStyle::Trail => {
                let color = if returning.contains(&edge) {
                    palette.backtrack
                } else {
                    let _ = returning.insert(edge.reversed());
                    palette.trail
                };
                sink.set(from, color)?;
            }
            WalkStyle::Dot => {
                sink.set(to, palette.trail)?;
                sink.set(from, palette.background)?;
            }
        }
        sink.flush()?;
    }

    if let Some(last) = walk.last_vertex() {
        sink.set(led(topology, size, last)?, palette.target)?;
        sink.flush()?;
    }
    Ok(())
}

/// Paints the pixels affected by a pursuit event.
///
/// Events that move nothing leave the strip untouched and skip the flush.
pub fn paint_event(
    sink: &mut impl LedSink,
    topology: &Topology,
    size: GridSize,
    event: &PursuitEvent,
    palette: &Palette,
) -> AnyResult<()> {
    let agent_color = |agent: Agent| match agent {
        Agent::Pursuer => palette.pursuer,
        Agent::Evader => palette.evader,
    };

    match *event {
        PursuitEvent::AgentMoved { agent, from, to } => {
            sink.set(led(topology, size, from)?, palette.background)?;
            sink.set(led(topology, size, to)?, agent_color(agent))?;
        }
        PursuitEvent::AgentTeleported { from, to, .. } => {
            sink.set(led(topology, size, from)?, palette.background)?;
            sink.set(led(topology, size, to)?, palette.pursuer)?;
        }
        PursuitEvent::Captured { at, .. } => {
            sink.set(led(topology, size, at)?, palette.target)?;
        }
        PursuitEvent::WindowWidened { .. } | PursuitEvent::Aborted { .. } => return Ok(()),
    }
    sink.flush()
}

/// Moves an explorer along `walk` and a chaser along `chaser` in lockstep.
///
/// One flush per shared step. Afterwards the explorer's cell is marked with
/// the finish colour when it stands on `finish`, otherwise as caught.
pub fn paint_race(
    sink: &mut impl LedSink,
    topology: &Topology,
    size: GridSize,
    walk: &Path,
    chaser: &Path,
    finish: VertexId,
    palette: &Palette,
) -> AnyResult<()> {
    let mut explorer = walk.first_vertex();
    for (walker_edge, chaser_edge) in walk.iter().zip(chaser.iter()) {
        sink.set(led(topology, size, walker_edge.from())?, palette.background)?;
        sink.set(led(topology, size, walker_edge.to())?, palette.trail)?;
        sink.set(led(topology, size, chaser_edge.from())?, palette.background)?;
        sink.set(led(topology, size, chaser_edge.to())?, palette.target)?;
        sink.flush()?;
        explorer = Some(walker_edge.to());
    }

    let Some(explorer) = explorer else {
        return Ok(());
    };
    let color = if explorer == finish {
        palette.finish
    } else {
        palette.target
    };
    sink.set(led(topology, size, explorer)?, color)?;
    sink.flush()
}

fn led(topology: &Topology, size: GridSize, vertex: VertexId) -> AnyResult<usize> {
    let coord = topology.require_vertex(vertex)?;
    Ok(serpentine_index(size, coord))
}

/// Errors raised by the rendering contracts.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// A buffer must cover at least one cell.
    EmptyGrid {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
    /// The LED index lies past the end of the strip.
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Length of the strip.
        len: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { rows, columns } => {
                write!(f, "frame buffer must cover at least one cell ({rows}x{columns})")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "LED index {index} is out of range for a strip of {len}")
            }
        }
    }
}

impl Error for RenderingError {}
