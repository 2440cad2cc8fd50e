//! The 5×5 building grid.
//!
//! ## Position
//!
//! An in-bounds `(row, column)` pair. Out-of-bounds coordinates never become
//! a `Position`; lookups with raw coordinates return `None` instead.
//!
//! ## Board
//!
//! An arena of 25 `Cell`s indexed by position. Workers refer to cells by
//! `Position`, so the board holds no references to players and occupancy is
//! answered by the `Game`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::direction::Direction;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: usize = 5;

/// Floors a cell can hold before only a dome fits on top.
pub const MAX_FLOORS: u8 = 3;

/// An in-bounds cell coordinate.
///
/// Deserializes from `{"row", "column"}` and rejects off-board values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    column: u8,
}

/// Unchecked wire form of a `Position`.
#[derive(Deserialize)]
struct RawPosition {
    row: u8,
    column: u8,
}

/// Coordinates outside the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("position ({row}, {column}) is off the board")]
pub struct OffBoardPosition {
    pub row: u8,
    pub column: u8,
}

impl TryFrom<RawPosition> for Position {
    type Error = OffBoardPosition;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::try_new(i32::from(raw.row), i32::from(raw.column)).ok_or(OffBoardPosition {
            row: raw.row,
            column: raw.column,
        })
    }
}

impl Position {
    /// Create a position.
    ///
    /// Panics if either coordinate is outside the board.
    #[must_use]
    pub fn new(row: u8, column: u8) -> Self {
        assert!(
            (row as usize) < BOARD_SIZE && (column as usize) < BOARD_SIZE,
            "Position ({row}, {column}) is off the board"
        );
        Self { row, column }
    }

    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[must_use]
    pub const fn column(self) -> u8 {
        self.column
    }

    /// Create a position from signed coordinates, `None` when out of bounds.
    #[must_use]
    pub fn try_new(row: i32, column: i32) -> Option<Self> {
        let size = BOARD_SIZE as i32;
        if (0..size).contains(&row) && (0..size).contains(&column) {
            Some(Self {
                row: row as u8,
                column: column as u8,
            })
        } else {
            None
        }
    }

    /// The neighbouring position in `direction`, if it is on the board.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dr, dc) = direction.delta();
        Self::try_new(i32::from(self.row) + dr, i32::from(self.column) + dc)
    }

    /// Direction from `self` to `other`.
    ///
    /// Only defined for cells at Chebyshev distance 1; `None` otherwise.
    #[must_use]
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        let dr = i32::from(other.row) - i32::from(self.row);
        let dc = i32::from(other.column) - i32::from(self.column);
        Direction::from_delta(dr, dc)
    }

    /// Check whether `other` is one of the up-to-8 neighbours.
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        self.direction_to(other).is_some()
    }

    fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.column as usize
    }

    /// Iterate over every position, row by row.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE as u8).flat_map(|row| (0..BOARD_SIZE as u8).map(move |column| Position { row, column }))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A single buildable cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    floors: u8,
    dome: bool,
}

impl Cell {
    fn new(position: Position) -> Self {
        Self {
            position,
            floors: 0,
            dome: false,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Number of floors built (0..=3).
    #[must_use]
    pub fn floors(&self) -> u8 {
        self.floors
    }

    #[must_use]
    pub fn has_dome(&self) -> bool {
        self.dome
    }

    /// Add one floor; on a full tower the increment becomes a dome.
    ///
    /// Idempotent once the cell is domed at three floors.
    pub fn add_floor(&mut self) {
        if self.floors < MAX_FLOORS {
            self.floors += 1;
        } else {
            self.dome = true;
        }
    }

    /// Cap the cell with a dome at whatever height it has.
    ///
    /// Standard builds only reach this at three floors; some powers dome
    /// lower cells.
    pub fn place_dome(&mut self) {
        self.dome = true;
    }

    /// Three floors and a dome.
    #[must_use]
    pub fn is_complete_tower(&self) -> bool {
        self.dome && self.floors == MAX_FLOORS
    }
}

/// The fixed 5×5 grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board: no floors, no domes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: Position::all().map(Cell::new).collect(),
        }
    }

    /// Cell at signed coordinates, `None` when out of bounds.
    #[must_use]
    pub fn cell_at(&self, row: i32, column: i32) -> Option<&Cell> {
        Position::try_new(row, column).map(|pos| self.cell(pos))
    }

    /// Cell at an in-bounds position.
    #[must_use]
    pub fn cell(&self, position: Position) -> &Cell {
        &self.cells[position.index()]
    }

    pub fn cell_mut(&mut self, position: Position) -> &mut Cell {
        &mut self.cells[position.index()]
    }

    /// The up-to-8 in-bounds neighbours of `position`.
    pub fn adjacent_cells(&self, position: Position) -> impl Iterator<Item = &Cell> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| position.step(dir))
            .map(|pos| self.cell(pos))
    }

    /// The neighbour of `position` in `direction`.
    #[must_use]
    pub fn next_cell(&self, position: Position, direction: Direction) -> Option<&Cell> {
        position.step(direction).map(|pos| self.cell(pos))
    }

    /// The cell whose neighbour in `direction` is `position`.
    ///
    /// Found by scanning the neighbours of `position`.
    #[must_use]
    pub fn prev_cell(&self, position: Position, direction: Direction) -> Option<&Cell> {
        self.adjacent_cells(position)
            .find(|cell| cell.position().step(direction) == Some(position))
    }

    /// Floor difference `to - from`.
    #[must_use]
    pub fn level_difference(&self, from: Position, to: Position) -> i8 {
        self.cell(to).floors() as i8 - self.cell(from).floors() as i8
    }

    /// Iterate over all cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_at_bounds() {
        let board = Board::new();
        assert!(board.cell_at(0, 0).is_some());
        assert!(board.cell_at(4, 4).is_some());
        assert!(board.cell_at(5, 0).is_none());
        assert!(board.cell_at(1, 5).is_none());
        assert!(board.cell_at(-1, 2).is_none());
    }

    #[test]
    fn test_adjacent_counts() {
        let board = Board::new();
        assert_eq!(board.adjacent_cells(Position::new(0, 0)).count(), 3);
        assert_eq!(board.adjacent_cells(Position::new(0, 2)).count(), 5);
        assert_eq!(board.adjacent_cells(Position::new(2, 2)).count(), 8);
    }

    #[test]
    fn test_add_floor_caps_with_dome() {
        let mut board = Board::new();
        let pos = Position::new(1, 1);
        for expected in 1..=3 {
            board.cell_mut(pos).add_floor();
            assert_eq!(board.cell(pos).floors(), expected);
            assert!(!board.cell(pos).has_dome());
        }

        board.cell_mut(pos).add_floor();
        assert!(board.cell(pos).has_dome());
        assert!(board.cell(pos).is_complete_tower());

        board.cell_mut(pos).add_floor();
        assert_eq!(board.cell(pos).floors(), 3);
        assert!(board.cell(pos).is_complete_tower());
    }

    #[test]
    fn test_low_dome_is_not_complete_tower() {
        let mut board = Board::new();
        let pos = Position::new(3, 3);
        board.cell_mut(pos).place_dome();
        assert!(board.cell(pos).has_dome());
        assert!(!board.cell(pos).is_complete_tower());
    }

    #[test]
    fn test_next_and_prev_cell() {
        let board = Board::new();
        let origin = Position::new(2, 2);

        let next = board.next_cell(origin, Direction::NorthEast).unwrap();
        assert_eq!(next.position(), Position::new(1, 3));

        let prev = board.prev_cell(origin, Direction::NorthEast).unwrap();
        assert_eq!(prev.position(), Position::new(3, 1));

        assert!(board.next_cell(Position::new(0, 4), Direction::East).is_none());
        assert!(board.prev_cell(Position::new(0, 0), Direction::South).is_none());
    }

    #[test]
    fn test_deserialize_rejects_off_board() {
        let pos: Position = serde_json::from_str(r#"{"row":4,"column":3}"#).unwrap();
        assert_eq!((pos.row(), pos.column()), (4, 3));

        assert!(serde_json::from_str::<Position>(r#"{"row":5,"column":4}"#).is_err());
        assert!(serde_json::from_str::<Position>(r#"{"row":0,"column":7}"#).is_err());

        let json = serde_json::to_string(&Position::new(1, 2)).unwrap();
        assert_eq!(json, r#"{"row":1,"column":2}"#);
    }

    #[test]
    fn test_direction_to_only_for_neighbors() {
        let a = Position::new(1, 1);
        assert_eq!(a.direction_to(Position::new(0, 1)), Some(Direction::North));
        assert_eq!(a.direction_to(Position::new(2, 0)), Some(Direction::SouthWest));
        assert_eq!(a.direction_to(a), None);
        assert_eq!(a.direction_to(Position::new(3, 1)), None);
    }

    #[test]
    fn test_level_difference() {
        let mut board = Board::new();
        let low = Position::new(0, 0);
        let high = Position::new(0, 1);
        board.cell_mut(high).add_floor();
        board.cell_mut(high).add_floor();

        assert_eq!(board.level_difference(low, high), 2);
        assert_eq!(board.level_difference(high, low), -2);
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn test_position_out_of_bounds() {
        let _ = Position::new(5, 0);
    }
}
