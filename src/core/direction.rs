//! Compass directions between adjacent cells.
//!
//! Rows grow southwards and columns grow eastwards, so `North` is a
//! row delta of -1. Every non-zero `(row, column)` delta in `{-1, 0, 1}²`
//! maps to exactly one direction and back.

use serde::{Deserialize, Serialize};

/// One of the eight compass directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// The `(row, column)` delta this direction moves by.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// The direction for a `(row, column)` delta.
    ///
    /// Returns `None` for `(0, 0)` and for any component outside `-1..=1`.
    #[must_use]
    pub const fn from_delta(row: i32, column: i32) -> Option<Direction> {
        match (row, column) {
            (-1, 0) => Some(Direction::North),
            (-1, 1) => Some(Direction::NorthEast),
            (0, 1) => Some(Direction::East),
            (1, 1) => Some(Direction::SouthEast),
            (1, 0) => Some(Direction::South),
            (1, -1) => Some(Direction::SouthWest),
            (0, -1) => Some(Direction::West),
            (-1, -1) => Some(Direction::NorthWest),
            _ => None,
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        };
        f.write_str(name)
    }
}
