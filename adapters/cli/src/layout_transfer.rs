use std::{collections::BTreeSet, error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_chase_core::{Coord, GridSize, Maze};
use serde::{Deserialize, Serialize};

const SNAPSHOT_DOMAIN: &str = "maze";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of a maze's walls and border openings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MazeSnapshot {
    /// Number of rows contained in the grid.
    pub(crate) rows: u32,
    /// Number of columns contained in the grid.
    pub(crate) columns: u32,
    /// Wall cells in row-major order.
    pub(crate) walls: Vec<Coord>,
    /// Opening on the left border.
    pub(crate) entrance: Option<Coord>,
    /// Opening on the right border.
    pub(crate) exit: Option<Coord>,
}

impl MazeSnapshot {
    /// Captures the provided maze.
    #[must_use]
    pub(crate) fn from_maze(maze: &Maze) -> Self {
        Self {
            rows: maze.size().rows(),
            columns: maze.size().columns(),
            walls: maze.walls().iter().copied().collect(),
            entrance: maze.entrance(),
            exit: maze.exit(),
        }
    }

    /// Rebuilds the maze, rejecting cells outside the grid.
    pub(crate) fn into_maze(self) -> Result<Maze, LayoutTransferError> {
        let size = GridSize::new(self.rows, self.columns);
        let walls: BTreeSet<Coord> = self.walls.into_iter().collect();

        if let Some(outside) = walls.iter().find(|coord| !size.contains(**coord)) {
            return Err(LayoutTransferError::CellOutOfBounds(*outside));
        }
        for opening in [self.entrance, self.exit].into_iter().flatten() {
            if !size.is_border(opening) || walls.contains(&opening) {
                return Err(LayoutTransferError::InvalidOpening(opening));
            }
        }

        Ok(Maze::new(size, walls, self.entrance, self.exit))
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = SerializableSnapshot {
            walls: self.walls.clone(),
            entrance: self.entrance,
            exit: self.exit,
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}{FIELD_DELIMITER}{}x{}{FIELD_DELIMITER}{encoded}",
            self.rows, self.columns
        ))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (rows, columns) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            rows,
            columns,
            walls: decoded.walls,
            entrance: decoded.entrance,
            exit: decoded.exit,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    walls: Vec<Coord>,
    entrance: Option<Coord>,
    exit: Option<Coord>,
}

/// Errors that can occur while transferring maze layouts.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded snapshot.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    InvalidPayload(serde_json::Error),
    /// A wall cell lies outside the declared grid.
    CellOutOfBounds(Coord),
    /// An opening is off the border or blocked by a wall.
    InvalidOpening(Coord),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "layout string was empty"),
            Self::MissingPrefix => write!(f, "layout string is missing the prefix"),
            Self::MissingVersion => write!(f, "layout string is missing the version"),
            Self::MissingDimensions => write!(f, "layout string is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "layout string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "layout prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "layout version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode layout payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not process layout payload: {error}")
            }
            Self::CellOutOfBounds(coord) => write!(
                f,
                "wall cell ({}, {}) lies outside the grid",
                coord.row(),
                coord.column()
            ),
            Self::InvalidOpening(coord) => write!(
                f,
                "opening ({}, {}) must be an open border cell",
                coord.row(),
                coord.column()
            ),
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (rows, columns) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;

    if rows == 0 || columns == 0 {
        return Err(invalid());
    }

    Ok((rows, columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(rows: u32, columns: u32) -> Maze {
        let size = GridSize::new(rows, columns);
        let mut walls: BTreeSet<Coord> = size.coords().filter(|c| size.is_border(*c)).collect();
        let entrance = Coord::new(1, 0);
        let exit = Coord::new(rows - 2, columns - 1);
        let _ = walls.remove(&entrance);
        let _ = walls.remove(&exit);
        Maze::new(size, walls, Some(entrance), Some(exit))
    }

    #[test]
    fn snapshot_restores_the_maze() {
        let maze = framed(6, 9);
        let encoded = MazeSnapshot::from_maze(&maze).encode().expect("snapshot encodes");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:6x9:")));

        let decoded = MazeSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(decoded.into_maze().expect("valid maze"), maze);
    }

    #[test]
    fn decode_rejects_foreign_prefixes_and_versions() {
        assert!(matches!(
            MazeSnapshot::decode("grid:v1:4x4:e30"),
            Err(LayoutTransferError::InvalidPrefix(prefix)) if prefix == "grid"
        ));
        assert!(matches!(
            MazeSnapshot::decode("maze:v9:4x4:e30"),
            Err(LayoutTransferError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            MazeSnapshot::decode("maze:v1:0x4:e30"),
            Err(LayoutTransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            MazeSnapshot::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
    }

    #[test]
    fn out_of_bounds_cells_are_rejected() {
        let snapshot = MazeSnapshot {
            rows: 3,
            columns: 3,
            walls: vec![Coord::new(3, 0)],
            entrance: None,
            exit: None,
        };
        assert!(matches!(
            snapshot.into_maze(),
            Err(LayoutTransferError::CellOutOfBounds(coord)) if coord == Coord::new(3, 0)
        ));
    }

    #[test]
    fn interior_openings_are_rejected() {
        let snapshot = MazeSnapshot {
            rows: 4,
            columns: 4,
            walls: Vec::new(),
            entrance: Some(Coord::new(1, 1)),
            exit: None,
        };
        assert!(matches!(
            snapshot.into_maze(),
            Err(LayoutTransferError::InvalidOpening(_))
        ));
    }
}
