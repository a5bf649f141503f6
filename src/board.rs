//! Game board: cell grid, ship placement, shot resolution.

use alloc::vec::Vec;
use core::fmt;

use rand::Rng;

use crate::common::{BoardError, CellState};
use crate::config::{fleet_classes, BOARD_SIZE, FLEET, MAX_PLACEMENT_ATTEMPTS};
use crate::grid::Position;
use crate::ship::{Orientation, Ship, ShipClass};

/// Full-fleet retries before random placement reports failure.
const MAX_FLEET_ATTEMPTS: usize = 20;

type Grid = [[CellState; BOARD_SIZE]; BOARD_SIZE];

/// One side's waters: the cell grid and the ships placed on it.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    grid: Grid,
    ships: Vec<Ship>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board (no ships placed, nothing shot).
    pub fn new() -> Self {
        Board {
            grid: [[CellState::Empty; BOARD_SIZE]; BOARD_SIZE],
            ships: Vec::new(),
        }
    }

    /// State of a single cell.
    pub fn cell(&self, pos: Position) -> CellState {
        self.grid[pos.row()][pos.col()]
    }

    /// `true` once `pos` has been fired at.
    pub fn already_shot(&self, pos: Position) -> bool {
        self.cell(pos).is_resolved()
    }

    /// Cells that have not been fired at yet, row by row.
    pub fn unshot_cells(&self) -> Vec<Position> {
        Position::all().filter(|p| !self.already_shot(*p)).collect()
    }

    /// `true` iff the whole footprint of `ship` anchored at (`row`, `col`)
    /// is on the board and every covered cell is `Empty`.
    pub fn can_place(&self, ship: &Ship, row: usize, col: usize) -> bool {
        match ship.footprint(row, col) {
            Ok(mut cells) => cells.all(|p| self.cell(p) == CellState::Empty),
            Err(_) => false,
        }
    }

    /// Place a copy of `ship` anchored at (`row`, `col`). Returns `false`
    /// and leaves the board untouched when [`Board::can_place`] is `false`.
    pub fn place(&mut self, ship: &Ship, row: usize, col: usize) -> bool {
        self.try_place(ship, row, col).is_ok()
    }

    /// Like [`Board::place`], but reports why a placement was refused.
    pub fn try_place(&mut self, ship: &Ship, row: usize, col: usize) -> Result<(), BoardError> {
        let cells: Vec<Position> = ship.footprint(row, col)?.collect();
        if cells.iter().any(|p| self.cell(*p) != CellState::Empty) {
            return Err(BoardError::ShipOverlaps);
        }
        for p in &cells {
            self.grid[p.row()][p.col()] = CellState::Ship;
        }
        let mut placed = ship.clone();
        placed.set_cells(cells);
        self.ships.push(placed);
        Ok(())
    }

    /// Take the ship covering `at` off the board and hand it back, cells
    /// cleared, for re-placement. `None` when no ship covers `at`.
    pub fn remove(&mut self, at: Position) -> Option<Ship> {
        let index = self.ships.iter().position(|s| s.occupies(at))?;
        let mut ship = self.ships.remove(index);
        for p in ship.cells() {
            self.grid[p.row()][p.col()] = CellState::Empty;
        }
        ship.clear_cells();
        Some(ship)
    }

    /// Fire at (`row`, `col`).
    pub fn fire(&mut self, row: usize, col: usize) -> Result<CellState, BoardError> {
        self.fire_at(Position::new(row, col)?)
    }

    /// Resolve a shot at `pos`. Firing at a cell that was already shot is a
    /// no-op returning its current state.
    pub fn fire_at(&mut self, pos: Position) -> Result<CellState, BoardError> {
        match self.cell(pos) {
            state @ (CellState::Water | CellState::Hit | CellState::Sunk) => Ok(state),
            CellState::Empty => {
                self.grid[pos.row()][pos.col()] = CellState::Water;
                Ok(CellState::Water)
            }
            CellState::Ship => {
                let ship = self
                    .ships
                    .iter_mut()
                    .find(|s| s.occupies(pos))
                    .ok_or(BoardError::InvalidBoard("ship cell without an owning ship"))?;
                ship.register_hit();
                if ship.is_sunk() {
                    for p in ship.cells() {
                        self.grid[p.row()][p.col()] = CellState::Sunk;
                    }
                    Ok(CellState::Sunk)
                } else {
                    self.grid[pos.row()][pos.col()] = CellState::Hit;
                    Ok(CellState::Hit)
                }
            }
        }
    }

    /// Returns `true` when every placed ship is sunk. An empty board counts
    /// as sunk.
    pub fn all_sunk(&self) -> bool {
        self.ships.iter().all(Ship::is_sunk)
    }

    /// Number of ships already sunk.
    pub fn ships_sunk(&self) -> usize {
        self.ships.iter().filter(|s| s.is_sunk()).count()
    }

    /// Copy of the placed ships.
    pub fn ships(&self) -> Vec<Ship> {
        self.ships.clone()
    }

    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    /// The ship covering `pos`, if any.
    pub fn ship_at(&self, pos: Position) -> Option<&Ship> {
        self.ships.iter().find(|s| s.occupies(pos))
    }

    /// `true` when the board carries exactly the hulls of a complete fleet.
    pub fn is_fleet_complete(&self) -> bool {
        FLEET.iter().all(|class| {
            self.ships.iter().filter(|s| s.class() == *class).count() == class.quantity()
        })
    }

    /// Returns a random free (row, col, Orientation) for a ship of `class`.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        class: ShipClass,
    ) -> Result<(usize, usize, Orientation), BoardError> {
        let len = class.size();
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let orient = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let max_r = if orient == Orientation::Vertical {
                BOARD_SIZE - len
            } else {
                BOARD_SIZE - 1
            };
            let max_c = if orient == Orientation::Horizontal {
                BOARD_SIZE - len
            } else {
                BOARD_SIZE - 1
            };
            let r = rng.random_range(0..=max_r);
            let c = rng.random_range(0..=max_c);
            if self.can_place(&Ship::new(class, orient), r, c) {
                return Ok((r, c, orient));
            }
        }
        Err(BoardError::UnableToPlaceShip)
    }

    /// Place a complete fleet at random on an empty board. Starts over when
    /// a ship cannot be fitted.
    pub fn place_fleet_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BoardError> {
        if !self.ships.is_empty() {
            return Err(BoardError::ShipAlreadyPlaced);
        }
        'fleet: for _ in 0..MAX_FLEET_ATTEMPTS {
            for class in fleet_classes() {
                match self.random_placement(rng, class) {
                    Ok((r, c, o)) => self.try_place(&Ship::new(class, o), r, c)?,
                    Err(_) => {
                        *self = Board::new();
                        continue 'fleet;
                    }
                }
            }
            return Ok(());
        }
        Err(BoardError::UnableToPlaceShip)
    }

    /// Check the structural invariants: ships well formed and inside the
    /// grid, no overlap, every ship cell owned by exactly one ship, and cell
    /// states consistent with each ship's damage.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut owners = [[0u8; BOARD_SIZE]; BOARD_SIZE];
        for ship in &self.ships {
            if !ship.is_well_formed() {
                return Err(BoardError::InvalidBoard("malformed ship"));
            }
            if ship.hits() > ship.size() {
                return Err(BoardError::InvalidBoard("ship has more hits than cells"));
            }
            let mut damaged = 0;
            for p in ship.cells() {
                owners[p.row()][p.col()] += 1;
                match self.cell(*p) {
                    CellState::Ship => {}
                    CellState::Hit if !ship.is_sunk() => damaged += 1,
                    CellState::Sunk if ship.is_sunk() => damaged += 1,
                    _ => return Err(BoardError::InvalidBoard("cell state disagrees with ship")),
                }
            }
            if damaged != ship.hits() {
                return Err(BoardError::InvalidBoard("hit count disagrees with cells"));
            }
        }
        for p in Position::all() {
            let owned = owners[p.row()][p.col()];
            if owned > 1 {
                return Err(BoardError::InvalidBoard("ships overlap"));
            }
            if self.cell(p).has_ship() != (owned == 1) {
                return Err(BoardError::InvalidBoard("ship cell without an owning ship"));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        for row in &self.grid {
            f.write_str("  ")?;
            for cell in row {
                let ch = match cell {
                    CellState::Empty => '.',
                    CellState::Water => 'o',
                    CellState::Ship => 'S',
                    CellState::Hit => 'X',
                    CellState::Sunk => '#',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  ships: {:?}", self.ships)?;
        write!(f, "}}")
    }
}
