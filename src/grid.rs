//! Grid coordinates.

use core::fmt;

use crate::common::BoardError;
use crate::config::BOARD_SIZE;

/// Axis-aligned neighbour offsets: north, south, west, east.
const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A cell on the board, 0-indexed, always inside `[0, BOARD_SIZE)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    row: usize,
    col: usize,
}

/// `true` when (`row`, `col`) lies on the board.
#[inline]
pub fn in_bounds(row: usize, col: usize) -> bool {
    row < BOARD_SIZE && col < BOARD_SIZE
}

impl Position {
    pub fn new(row: usize, col: usize) -> Result<Self, BoardError> {
        if in_bounds(row, col) {
            Ok(Position { row, col })
        } else {
            Err(BoardError::OutOfBounds { row, col })
        }
    }

    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }

    /// Shift by (`dr`, `dc`); `None` if that leaves the grid.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Position::new(row, col).ok()
    }

    /// In-bounds neighbours in fixed order: north, south, west, east.
    pub fn neighbours(self) -> impl Iterator<Item = Position> {
        DIRECTIONS
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }

    /// Every cell of the board, row by row.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
    }

    /// Caller has already checked the bounds.
    pub(crate) fn on_board(row: usize, col: usize) -> Self {
        debug_assert!(in_bounds(row, col));
        Position { row, col }
    }

    pub(crate) fn is_valid(self) -> bool {
        in_bounds(self.row, self.col)
    }
}

impl From<Position> for (usize, usize) {
    fn from(p: Position) -> Self {
        (p.row, p.col)
    }
}

impl TryFrom<(usize, usize)> for Position {
    type Error = BoardError;

    fn try_from((row, col): (usize, usize)) -> Result<Self, Self::Error> {
        Position::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
