// Hunt/target guessing logic for the computer opponent.
// Reads the human's board only through `already_shot`/`unshot_cells`.

use alloc::vec::Vec;

use log::debug;
use rand::Rng;

use crate::board::Board;
use crate::common::CellState;
use crate::grid::Position;

/// Search mode of the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetingMode {
    /// Uniformly random shots among unshot cells.
    #[default]
    Hunt,
    /// Probing the neighbours of a confirmed hit.
    Target,
}

/// The part of the opponent's memory that survives a save/load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetingState {
    pub mode: TargetingMode,
    /// Most recent hit not yet resolved to a sinking. Set iff `mode` is
    /// `Target`.
    pub origin: Option<Position>,
}

impl TargetingState {
    /// Update the mode after the shot at `at` resolved to `result`.
    pub fn observe(&mut self, at: Position, result: CellState) {
        match result {
            CellState::Hit => {
                self.mode = TargetingMode::Target;
                self.origin = Some(at);
            }
            CellState::Sunk => *self = TargetingState::default(),
            _ => {}
        }
    }

    pub(crate) fn is_consistent(&self) -> bool {
        match (self.mode, self.origin) {
            (TargetingMode::Hunt, None) => true,
            (TargetingMode::Target, Some(origin)) => origin.is_valid(),
            _ => false,
        }
    }
}

/// Hunt/target opponent.
///
/// Hunt picks are drawn from a pool of candidate cells (swap-remove, stale
/// entries skipped), refilled from the board whenever it runs dry. The pool
/// is a cache and is neither persisted nor compared.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Targeter {
    state: TargetingState,
    #[cfg_attr(feature = "std", serde(skip))]
    pool: Vec<Position>,
}

impl PartialEq for Targeter {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl Eq for Targeter {}

impl Targeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a previously saved state.
    pub fn from_state(state: TargetingState) -> Self {
        Targeter {
            state,
            pool: Vec::new(),
        }
    }

    pub fn state(&self) -> TargetingState {
        self.state
    }

    pub fn mode(&self) -> TargetingMode {
        self.state.mode
    }

    pub fn origin(&self) -> Option<Position> {
        self.state.origin
    }

    /// Choose the next cell to fire at on `board`. `None` only when every
    /// cell has already been shot.
    pub fn next_target<R: Rng + ?Sized>(&mut self, board: &Board, rng: &mut R) -> Option<Position> {
        if let (TargetingMode::Target, Some(origin)) = (self.state.mode, self.state.origin) {
            if let Some(next) = origin.neighbours().find(|p| !board.already_shot(*p)) {
                debug!("targeting {} next to hit at {}", next, origin);
                return Some(next);
            }
            debug!("no open neighbour around {}, back to hunting", origin);
            self.state = TargetingState::default();
        }
        self.hunt(board, rng)
    }

    /// Update the mode after our shot at `at` resolved to `result`.
    pub fn observe(&mut self, at: Position, result: CellState) {
        self.state.observe(at, result);
    }

    fn hunt<R: Rng + ?Sized>(&mut self, board: &Board, rng: &mut R) -> Option<Position> {
        // Second pass only runs after a refill, so at most two sweeps.
        for _ in 0..2 {
            while !self.pool.is_empty() {
                let idx = rng.random_range(0..self.pool.len());
                let candidate = self.pool.swap_remove(idx);
                if !board.already_shot(candidate) {
                    debug!("hunting at {}", candidate);
                    return Some(candidate);
                }
            }
            self.pool = board.unshot_cells();
        }
        None
    }
}
