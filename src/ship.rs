//! Ship definitions and placement footprints.

use alloc::vec::Vec;
use core::fmt;

use crate::common::BoardError;
use crate::config::BOARD_SIZE;
use crate::grid::Position;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// The four hull classes of a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShipClass {
    Carrier,
    Submarine,
    Destroyer,
    Frigate,
}

impl ShipClass {
    /// Number of cells the hull covers.
    pub const fn size(self) -> usize {
        match self {
            ShipClass::Carrier => 4,
            ShipClass::Submarine => 3,
            ShipClass::Destroyer => 2,
            ShipClass::Frigate => 1,
        }
    }

    /// How many hulls of this class a complete fleet carries.
    pub const fn quantity(self) -> usize {
        match self {
            ShipClass::Carrier => 1,
            ShipClass::Submarine => 2,
            ShipClass::Destroyer => 3,
            ShipClass::Frigate => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShipClass::Carrier => "Carrier",
            ShipClass::Submarine => "Submarine",
            ShipClass::Destroyer => "Destroyer",
            ShipClass::Frigate => "Frigate",
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fleet unit. Unplaced while `cells` is empty; once placed, `cells` holds
/// exactly `size` contiguous positions starting at the anchor.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    class: ShipClass,
    orientation: Orientation,
    cells: Vec<Position>,
    hits: usize,
}

impl Ship {
    /// A fresh, unplaced and undamaged ship.
    pub fn new(class: ShipClass, orientation: Orientation) -> Self {
        Ship {
            class,
            orientation,
            cells: Vec::new(),
            hits: 0,
        }
    }

    pub fn class(&self) -> ShipClass {
        self.class
    }

    pub fn size(&self) -> usize {
        self.class.size()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Change orientation. Only allowed while the ship is off the board.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), BoardError> {
        if self.is_placed() {
            return Err(BoardError::ShipAlreadyPlaced);
        }
        self.orientation = orientation;
        Ok(())
    }

    /// Flip between horizontal and vertical while unplaced.
    pub fn rotate(&mut self) -> Result<(), BoardError> {
        self.set_orientation(self.orientation.flipped())
    }

    /// Occupied cells, empty when unplaced.
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// First occupied cell.
    pub fn anchor(&self) -> Option<Position> {
        self.cells.first().copied()
    }

    pub fn is_placed(&self) -> bool {
        !self.cells.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn is_sunk(&self) -> bool {
        self.hits >= self.size()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Cells the ship would cover if anchored at (`row`, `col`).
    pub fn footprint(
        &self,
        row: usize,
        col: usize,
    ) -> Result<impl Iterator<Item = Position>, BoardError> {
        let len = self.size();
        let fits = row < BOARD_SIZE
            && col < BOARD_SIZE
            && match self.orientation {
                Orientation::Horizontal => len <= BOARD_SIZE - col,
                Orientation::Vertical => len <= BOARD_SIZE - row,
            };
        if !fits {
            return Err(BoardError::ShipOutOfBounds);
        }
        let orientation = self.orientation;
        Ok((0..len).map(move |i| match orientation {
            Orientation::Horizontal => Position::on_board(row, col + i),
            Orientation::Vertical => Position::on_board(row + i, col),
        }))
    }

    pub(crate) fn set_cells(&mut self, cells: Vec<Position>) {
        self.cells = cells;
    }

    pub(crate) fn clear_cells(&mut self) {
        self.cells.clear();
    }

    pub(crate) fn register_hit(&mut self) {
        self.hits += 1;
    }

    /// `true` when `cells` is a straight run of `size` positions matching
    /// `orientation`.
    pub(crate) fn is_well_formed(&self) -> bool {
        let Some(anchor) = self.anchor() else {
            return false;
        };
        if !anchor.is_valid() || self.cells.len() != self.size() {
            return false;
        }
        match self.footprint(anchor.row(), anchor.col()) {
            Ok(expected) => expected.eq(self.cells.iter().copied()),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ class: {}, anchor: {:?}, orientation: {:?}, hits: {}/{} }}",
            self.class,
            self.anchor(),
            self.orientation,
            self.hits,
            self.size(),
        )
    }
}
