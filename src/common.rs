//! Common types: cell states and board errors.

/// State of a single board cell.
///
/// Cells only move forward: `Empty -> Water`, `Ship -> Hit -> Sunk` (or
/// straight `Ship -> Sunk` for a one-cell hull).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    /// Untouched, no ship.
    #[default]
    Empty,
    /// Shot at, missed.
    Water,
    /// Untouched, ship present. Never shown to the opponent.
    Ship,
    /// Shot at, ship present and still afloat.
    Hit,
    /// Shot at, the ship covering this cell went down.
    Sunk,
}

impl CellState {
    /// `true` once the cell has been shot at.
    pub fn is_resolved(self) -> bool {
        matches!(self, CellState::Water | CellState::Hit | CellState::Sunk)
    }

    /// `true` for every cell covered by a ship, hit or not.
    pub fn has_ship(self) -> bool {
        matches!(self, CellState::Ship | CellState::Hit | CellState::Sunk)
    }

    /// The state as the opposing side is allowed to see it.
    pub fn masked(self) -> Self {
        match self {
            CellState::Ship => CellState::Empty,
            other => other,
        }
    }
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Coordinates outside the grid.
    OutOfBounds { row: usize, col: usize },
    /// Ship would stick out of the grid.
    ShipOutOfBounds,
    /// Ship placement overlaps another ship.
    ShipOverlaps,
    /// Ship is already on the board.
    ShipAlreadyPlaced,
    /// Random placement ran out of attempts.
    UnableToPlaceShip,
    /// Board contents break a structural invariant.
    InvalidBoard(&'static str),
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::OutOfBounds { row, col } => {
                write!(f, "Coordinates out of bounds: row={}, col={}", row, col)
            }
            BoardError::ShipOutOfBounds => write!(f, "Ship placement is out of bounds"),
            BoardError::ShipOverlaps => write!(f, "Ship placement overlaps with another ship"),
            BoardError::ShipAlreadyPlaced => write!(f, "Ship is already placed on the board"),
            BoardError::UnableToPlaceShip => write!(f, "Unable to place ship"),
            BoardError::InvalidBoard(reason) => write!(f, "Invalid board: {}", reason),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
